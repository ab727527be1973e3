use super::*;

#[test]
fn text_output_is_not_an_error() {
    let out = ToolOutput::text("done");
    assert!(!out.is_error);
    assert_eq!(out.content.as_model_text(), "done");
}

#[test]
fn error_output_sets_flag() {
    let out = ToolOutput::error("boom");
    assert!(out.is_error);
}

#[test]
fn structured_output_serializes_value_as_model_text() {
    let out = ToolOutput::structured(serde_json::json!({"a": 1}));
    assert_eq!(out.content.as_model_text(), "{\"a\":1}");
}

#[test]
fn validation_result_is_valid_helper() {
    assert!(ValidationResult::Valid.is_valid());
    let invalid = ValidationResult::Invalid {
        errors: vec![ValidationError::with_path("missing", "name")],
    };
    assert!(!invalid.is_valid());
}

#[test]
fn unknown_display_block_tag_decodes() {
    let json = r#"{"kind":"future_block"}"#;
    let block: DisplayBlock = serde_json::from_str(json).expect("must decode");
    assert!(matches!(block, DisplayBlock::Unknown));
}
