use std::sync::Arc;

use super::*;
use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use wisp_approval::ApprovalGate;
use wisp_protocol::PermissionResult;
use wisp_tools_api::Injector;
use wisp_wire::new_wire;

use crate::{Tool, ToolError};

struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "Echo"
    }
    fn description(&self) -> &str {
        "echoes its message field"
    }
    fn input_schema(&self) -> Value {
        serde_json::json!({"type": "object", "required": ["message"]})
    }
    async fn execute(&self, input: Value, _ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::text(input["message"].as_str().unwrap_or_default()))
    }
}

struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "Failing"
    }
    fn description(&self) -> &str {
        "always fails"
    }
    fn input_schema(&self) -> Value {
        serde_json::json!({"type": "object"})
    }
    async fn execute(&self, _input: Value, _ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        Err(ToolError::ExecutionFailed { message: "boom".into() })
    }
}

struct GuardedTool;

#[async_trait]
impl Tool for GuardedTool {
    fn name(&self) -> &str {
        "Guarded"
    }
    fn description(&self) -> &str {
        "requires permission, always denied in this test"
    }
    fn input_schema(&self) -> Value {
        serde_json::json!({"type": "object"})
    }
    async fn check_permission(&self, _input: &Value, _ctx: &ToolContext) -> PermissionResult {
        PermissionResult::Denied { reason: "test denial".into() }
    }
    async fn execute(&self, _input: Value, _ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        panic!("execute must not run when permission is denied");
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

fn registry() -> ToolRegistry {
    let mut r = ToolRegistry::new();
    r.register(Arc::new(EchoTool));
    r.register(Arc::new(FailingTool));
    r.register(Arc::new(GuardedTool));
    r
}

#[tokio::test]
async fn unknown_tool_returns_error_output_without_touching_registry() {
    let reg = registry();
    let mut ctx = test_context();
    let result = dispatch(&reg, &mut ctx, "Nonexistent", "{}", "run", "desc").await;
    assert!(result.output.is_error);
    assert!(result.output.content.as_model_text().contains("Unknown tool"));
}

#[tokio::test]
async fn successful_call_returns_ran_outcome() {
    let reg = registry();
    let mut ctx = test_context();
    let result = dispatch(&reg, &mut ctx, "Echo", r#"{"message":"hi"}"#, "echo", "echo hi").await;
    assert_eq!(result.outcome, DispatchOutcome::Ran);
    assert!(!result.output.is_error);
    assert_eq!(result.output.content.as_model_text(), "hi");
}

#[tokio::test]
async fn handler_error_is_converted_to_error_output_not_a_panic() {
    let reg = registry();
    let mut ctx = test_context();
    let result = dispatch(&reg, &mut ctx, "Failing", "{}", "fail", "fail").await;
    assert!(result.output.is_error);
    assert!(result.output.content.as_model_text().contains("boom"));
}

#[tokio::test]
async fn permission_denial_short_circuits_before_execute() {
    let reg = registry();
    let mut ctx = test_context();
    let result = dispatch(&reg, &mut ctx, "Guarded", "{}", "guarded action", "desc").await;
    assert_eq!(result.outcome, DispatchOutcome::Rejected);
    assert!(result.output.is_error);
}

#[tokio::test]
async fn missing_required_field_fails_validation_before_execute() {
    let reg = registry();
    let mut ctx = test_context();
    let result = dispatch(&reg, &mut ctx, "Echo", "{}", "echo", "desc").await;
    assert!(result.output.is_error);
    assert!(result.output.content.as_model_text().contains("validation failed"));
}
