use super::*;
use crate::{assistant_with_tool_calls, tool_result_message, user_message};
use wisp_protocol::ToolCall;

#[test]
fn append_assigns_monotonic_seq() {
    let mut history = MessageHistory::new();
    history.append(user_message("one"));
    history.append(user_message("two"));
    assert_eq!(history.history()[0].seq, 0);
    assert_eq!(history.history()[1].seq, 1);
}

#[test]
fn checkpoints_are_strictly_increasing() {
    let mut history = MessageHistory::new();
    let a = history.checkpoint();
    let b = history.checkpoint();
    assert!(b > a);
    assert_eq!(history.n_checkpoints(), 2);
}

#[test]
fn append_usage_updates_token_count() {
    let mut history = MessageHistory::new();
    history.append_usage(UsageRecord {
        input_tokens: 5,
        output_tokens: 3,
        ..Default::default()
    });
    assert_eq!(history.token_count(), 8);
}

#[test]
fn filter_drops_messages_and_renumbers_seq() {
    let mut history = MessageHistory::new();
    history.append(user_message("keep"));
    history.append(user_message("drop"));
    history.append(user_message("keep2"));
    history.filter(|m| m.text_content() != "drop");
    assert_eq!(history.len(), 2);
    assert_eq!(history.history()[0].seq, 0);
    assert_eq!(history.history()[1].seq, 1);
}

#[test]
fn orphaned_tool_call_detected_when_no_result_appended() {
    let mut history = MessageHistory::new();
    history.append(assistant_with_tool_calls(
        None,
        vec![ToolCall {
            id: "c1".into(),
            name: "Read".into(),
            arguments: "{}".into(),
        }],
    ));
    assert_eq!(history.orphaned_tool_call_ids(), vec!["c1".to_string()]);

    history.append(tool_result_message("c1", "contents"));
    assert!(history.orphaned_tool_call_ids().is_empty());
}

#[test]
fn drops_trailing_tool_result_with_no_matching_assistant_call() {
    let mut history = MessageHistory::new();
    history.append(user_message("hi"));
    history.append(tool_result_message("missing-call", "stray"));
    assert!(history.drop_trailing_unpaired_tool_result());
    assert_eq!(history.len(), 1);
}

#[test]
fn keeps_trailing_tool_result_that_is_properly_paired() {
    let mut history = MessageHistory::new();
    history.append(assistant_with_tool_calls(
        None,
        vec![ToolCall {
            id: "c1".into(),
            name: "Read".into(),
            arguments: "{}".into(),
        }],
    ));
    history.append(tool_result_message("c1", "contents"));
    assert!(!history.drop_trailing_unpaired_tool_result());
    assert_eq!(history.len(), 2);
}

#[test]
fn replace_all_resets_sequence_numbers() {
    let mut history = MessageHistory::new();
    history.append(user_message("a"));
    history.append(user_message("b"));
    history.replace_all(vec![user_message("summary")]);
    assert_eq!(history.len(), 1);
    assert_eq!(history.history()[0].seq, 0);
}
