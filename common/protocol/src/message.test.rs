use super::*;

#[test]
fn user_message_has_single_text_part() {
    let msg = Message::user("hello");
    assert_eq!(msg.text_content(), "hello");
    assert!(msg.tool_calls().is_empty());
}

#[test]
fn tool_calls_extracted_from_assistant_message() {
    let msg = Message::assistant(vec![
        ContentPart::text("let me check"),
        ContentPart::ToolCall(ToolCall {
            id: "call_1".into(),
            name: "Read".into(),
            arguments: "{}".into(),
        }),
    ]);
    let calls = msg.tool_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "Read");
}

#[test]
fn without_thoughts_strips_thought_parts_only() {
    let msg = Message {
        role: Role::Assistant,
        content: vec![ContentPart::thought("internal reasoning"), ContentPart::text("final answer")],
        tool_call_id: None,
    };
    let stripped = msg.without_thoughts();
    assert_eq!(stripped.content.len(), 1);
    assert_eq!(stripped.text_content(), "final answer");
}

#[test]
fn unknown_content_tag_decodes_without_error() {
    let json = r#"{"type":"future_media_kind","blob":"xyz"}"#;
    let part: ContentPart = serde_json::from_str(json).expect("unknown tags must decode");
    assert!(matches!(part, ContentPart::Unknown));
}

#[test]
fn message_serde_round_trip() {
    let msg = Message::tool_result("call_1", "file contents");
    let json = serde_json::to_string(&msg).expect("serialize");
    let parsed: Message = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed.tool_call_id, Some("call_1".to_string()));
    assert_eq!(parsed.text_content(), "file contents");
}
