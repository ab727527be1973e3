//! Construction helpers for well-formed messages.
//!
//! Kept separate from ad-hoc `Message { .. }` literals so every call site
//! that needs a synthetic tool result (cancellation, rejection) goes through
//! one place.

use wisp_protocol::ContentPart;
use wisp_protocol::Message;
use wisp_protocol::Role;
use wisp_protocol::ToolCall;

pub fn user_message(text: impl Into<String>) -> Message {
    Message::user(text)
}

pub fn system_message(text: impl Into<String>) -> Message {
    Message::system(text)
}

/// An assistant message carrying one or more tool calls, with optional
/// accompanying text (e.g. "Let me check that file.").
pub fn assistant_with_tool_calls(text: Option<String>, calls: Vec<ToolCall>) -> Message {
    let mut content = Vec::new();
    if let Some(text) = text {
        content.push(ContentPart::text(text));
    }
    content.extend(calls.into_iter().map(ContentPart::ToolCall));
    Message::assistant(content)
}

pub fn tool_result_message(tool_call_id: impl Into<String>, text: impl Into<String>) -> Message {
    Message::tool_result(tool_call_id, text)
}

/// A tool result standing in for a call that never actually ran, because the
/// turn was cancelled or a prior call in the same step was rejected.
///
/// Required by Invariant 1 (§3 of the design): every tool call must have a
/// matching tool message before the history is handed back to a model.
pub fn synthetic_cancelled_result(tool_call_id: impl Into<String>, reason: &str) -> Message {
    Message {
        role: Role::Tool,
        content: vec![ContentPart::text(format!("Cancelled: {reason}"))],
        tool_call_id: Some(tool_call_id.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_with_tool_calls_includes_text_and_calls() {
        let msg = assistant_with_tool_calls(
            Some("checking".to_string()),
            vec![ToolCall {
                id: "c1".into(),
                name: "Read".into(),
                arguments: "{}".into(),
            }],
        );
        assert_eq!(msg.tool_calls().len(), 1);
        assert_eq!(msg.text_content(), "checking");
    }

    #[test]
    fn assistant_with_tool_calls_allows_no_text() {
        let msg = assistant_with_tool_calls(
            None,
            vec![ToolCall {
                id: "c1".into(),
                name: "Read".into(),
                arguments: "{}".into(),
            }],
        );
        assert_eq!(msg.text_content(), "");
        assert_eq!(msg.tool_calls().len(), 1);
    }

    #[test]
    fn synthetic_cancelled_result_is_paired_to_the_call_id() {
        let msg = synthetic_cancelled_result("c1", "turn cancelled");
        assert_eq!(msg.tool_call_id, Some("c1".to_string()));
        assert!(msg.text_content().contains("turn cancelled"));
    }
}
