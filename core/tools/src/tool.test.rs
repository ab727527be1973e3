use std::sync::Arc;

use super::*;
use tokio_util::sync::CancellationToken;
use wisp_approval::ApprovalGate;
use wisp_tools_api::Injector;
use wisp_wire::new_wire;

struct DummyTool;

#[async_trait]
impl Tool for DummyTool {
    fn name(&self) -> &str {
        "dummy"
    }

    fn description(&self) -> &str {
        "A dummy tool for testing"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": { "message": {"type": "string"} },
            "required": ["message"]
        })
    }

    async fn execute(&self, input: Value, _ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        let message = input["message"].as_str().ok_or_else(|| ToolError::invalid_input("message must be a string"))?;
        Ok(ToolOutput::text(format!("Received: {message}")))
    }
}

fn test_context() -> ToolContext {
    let pair = new_wire();
    ToolContext::new(
        "/tmp",
        Arc::new(pair.engine),
        Arc::new(ApprovalGate::new()),
        CancellationToken::new(),
        Injector::new(),
    )
}

#[tokio::test]
async fn tool_reports_name_and_is_concurrent_safe_by_default() {
    let tool = DummyTool;
    assert_eq!(tool.name(), "dummy");
    assert!(tool.is_concurrent_safe());
}

#[tokio::test]
async fn validate_flags_missing_required_field() {
    let tool = DummyTool;
    let valid = serde_json::json!({"message": "hello"});
    assert!(matches!(tool.validate(&valid).await, ValidationResult::Valid));

    let invalid = serde_json::json!({});
    assert!(matches!(tool.validate(&invalid).await, ValidationResult::Invalid { .. }));
}

#[tokio::test]
async fn execute_runs_and_returns_text_output() {
    let tool = DummyTool;
    let mut ctx = test_context();
    let output = tool
        .execute(serde_json::json!({"message": "hi"}), &mut ctx)
        .await
        .expect("execute");
    assert_eq!(output.content.as_model_text(), "Received: hi");
}

#[tokio::test]
async fn execute_propagates_invalid_input_error() {
    let tool = DummyTool;
    let mut ctx = test_context();
    let err = tool.execute(serde_json::json!({"message": 5}), &mut ctx).await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidInput { .. }));
}
