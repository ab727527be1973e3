//! The [`Tool`] trait: every tool implements a 5-stage pipeline.
//!
//! 1. **validate** — structural check of the arguments against the schema.
//! 2. **check_permission** — defers to the Approval Gate for side-effecting
//!    tools.
//! 3. **execute** — the actual work.
//! 4. **post_process** — optional output transformation.
//! 5. **cleanup** — best-effort, always runs.

use async_trait::async_trait;
use serde_json::Value;
use wisp_protocol::ConcurrencySafety;
use wisp_protocol::PermissionResult;
use wisp_protocol::ToolOutput;
use wisp_protocol::ValidationError;
use wisp_protocol::ValidationResult;
use wisp_tools_api::ToolContext;

use crate::ToolError;

/// A tool invocable from the dispatcher.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn input_schema(&self) -> Value;

    /// Default `Safe`: override to `Unsafe` for tools that mutate state
    /// (writes, shell commands) so the dispatcher never runs them
    /// concurrently with another call in the same step.
    fn concurrency_safety(&self) -> ConcurrencySafety {
        ConcurrencySafety::Safe
    }

    /// Default implementation checks the schema's `required` array is
    /// present in `input`. Override for deeper structural checks.
    async fn validate(&self, input: &Value) -> ValidationResult {
        let schema = self.input_schema();
        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for field in required {
                if let Some(field_name) = field.as_str() {
                    if input.get(field_name).is_none() {
                        return ValidationResult::Invalid {
                            errors: vec![ValidationError::with_path(
                                format!("missing required field: {field_name}"),
                                field_name,
                            )],
                        };
                    }
                }
            }
        }
        ValidationResult::Valid
    }

    /// Default implementation always allows. Override for tools that need
    /// the Approval Gate (file writes, shell commands, network access).
    async fn check_permission(&self, _input: &Value, _ctx: &ToolContext) -> PermissionResult {
        PermissionResult::Allowed
    }

    async fn execute(&self, input: Value, ctx: &mut ToolContext) -> Result<ToolOutput, ToolError>;

    /// Default implementation returns the output unchanged.
    async fn post_process(&self, output: ToolOutput, _ctx: &ToolContext) -> ToolOutput {
        output
    }

    /// Default implementation does nothing. Always runs, regardless of
    /// whether `execute` succeeded, failed, or the call was cancelled.
    async fn cleanup(&self, _ctx: &ToolContext) {}

    fn is_concurrent_safe(&self) -> bool {
        matches!(self.concurrency_safety(), ConcurrencySafety::Safe)
    }
}

#[cfg(test)]
#[path = "tool.test.rs"]
mod tests;
