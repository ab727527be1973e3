//! Terminal status of a finished (or still-running) subagent execution.

use serde::Deserialize;
use serde::Serialize;

/// How a subagent's turn loop ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubagentStatus {
    /// The agent's own loop is still running; `TaskOutput` should keep
    /// polling. Only ever observed for a background-spawned subagent.
    Running,
    /// Completed normally and produced a result.
    Completed,
    /// Ended because `loop_control.max_steps_per_turn` (or the definition's
    /// override) was reached without completing.
    MaxSteps,
    /// Cancelled by the parent soul (e.g. the parent turn itself was
    /// cancelled, or `TaskOutput` was told to abandon it).
    Cancelled,
    /// Ended on an unrecoverable tool or model error.
    Failed,
}

impl SubagentStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SubagentStatus::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_is_the_only_non_terminal_status() {
        assert!(!SubagentStatus::Running.is_terminal());
        assert!(SubagentStatus::Completed.is_terminal());
        assert!(SubagentStatus::MaxSteps.is_terminal());
        assert!(SubagentStatus::Cancelled.is_terminal());
        assert!(SubagentStatus::Failed.is_terminal());
    }
}
