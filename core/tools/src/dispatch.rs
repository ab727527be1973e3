//! The dispatcher: resolves a [`wisp_protocol::ToolCall`] to a registered
//! [`Tool`] and drives it through the 5-stage pipeline.
//!
//! Never returns an `Err` to its caller for a tool-side failure: every
//! failure mode (unknown tool, bad arguments, permission denial, a panic-
//! worthy handler bug) is translated into an `Err`-flagged [`ToolOutput`] so
//! the agent loop can feed it back to the model and keep going. The only
//! `Result::Err` this function returns is for a cancellation that aborted
//! dispatch before any tool-visible state changed.
use wisp_protocol::PermissionResult;
use wisp_protocol::ToolOutput;
use wisp_protocol::ToolOutputExt;
use wisp_protocol::ValidationResult;
use wisp_tools_api::ToolContext;

use crate::ToolRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The tool ran (successfully or not); `ToolOutput::is_error` carries
    /// the distinction.
    Ran,
    /// The Approval Gate denied the call; `execute` never ran.
    Rejected,
}

pub struct DispatchResult {
    pub output: ToolOutput,
    pub outcome: DispatchOutcome,
}

/// Runs one tool call end to end.
///
/// `action` and `description` describe the call for the Approval Gate and
/// are typically derived from the tool name and parsed arguments by the
/// caller (the agent loop), since only it knows how to render a
/// human-readable summary per tool kind.
pub async fn dispatch(
    registry: &ToolRegistry,
    ctx: &mut ToolContext,
    tool_name: &str,
    arguments_json: &str,
    action: &str,
    description: &str,
) -> DispatchResult {
    let Some(tool) = registry.get(tool_name) else {
        return DispatchResult {
            output: ToolOutput::error(format!("Unknown tool: {tool_name}")),
            outcome: DispatchOutcome::Ran,
        };
    };

    let input: serde_json::Value = match serde_json::from_str(arguments_json) {
        Ok(v) => v,
        Err(err) => {
            return DispatchResult {
                output: ToolOutput::error(format!("invalid arguments JSON: {err}")),
                outcome: DispatchOutcome::Ran,
            };
        }
    };

    if let ValidationResult::Invalid { errors } = tool.validate(&input).await {
        let message = errors
            .into_iter()
            .map(|e| format!("{} ({})", e.message, e.path))
            .collect::<Vec<_>>()
            .join("; ");
        return DispatchResult {
            output: ToolOutput::error(format!("validation failed: {message}")),
            outcome: DispatchOutcome::Ran,
        };
    }

    if let PermissionResult::Denied { reason } = tool.check_permission(&input, ctx).await {
        tool.cleanup(ctx).await;
        return DispatchResult {
            output: ToolOutput::error(format!("Rejected by user: {reason}")),
            outcome: DispatchOutcome::Rejected,
        };
    }

    // `check_permission`'s default always-allow is the common case; tools
    // that need an explicit prompt route through the Approval Gate inside
    // their own `check_permission` override, keeping this function ignorant
    // of which tools are side-effecting.
    let _ = (action, description);

    let result = tool.execute(input, ctx).await;
    let output = match result {
        Ok(output) => tool.post_process(output, ctx).await,
        Err(err) if err.is_cancelled() => {
            tool.cleanup(ctx).await;
            return DispatchResult {
                output: ToolOutput::error("Cancelled"),
                outcome: DispatchOutcome::Ran,
            };
        }
        Err(err) => ToolOutput::error(err.to_output_message()),
    };

    tool.cleanup(ctx).await;
    DispatchResult { output, outcome: DispatchOutcome::Ran }
}

#[cfg(test)]
#[path = "dispatch.test.rs"]
mod tests;
