//! [`SubagentResult`]: what `Task` hands back to the parent's tool result,
//! and what `TaskOutput` polls for a background-spawned agent.

use wisp_message::UsageRecord;

use crate::SubagentStatus;

/// Outcome of one subagent run, grounded on the teacher's executor result
/// type (trimmed to the fields this system's loop actually tracks).
#[derive(Debug, Clone)]
pub struct SubagentResult {
    pub agent_id: String,
    pub status: SubagentStatus,
    /// The final text the subagent produced, or an error message if
    /// `status` is [`SubagentStatus::Failed`].
    pub output: String,
    pub steps_used: u32,
    pub usage: UsageRecord,
}

impl SubagentResult {
    pub fn completed(agent_id: impl Into<String>, output: impl Into<String>, steps_used: u32, usage: UsageRecord) -> Self {
        Self {
            agent_id: agent_id.into(),
            status: SubagentStatus::Completed,
            output: output.into(),
            steps_used,
            usage,
        }
    }

    pub fn failed(agent_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            status: SubagentStatus::Failed,
            output: message.into(),
            steps_used: 0,
            usage: UsageRecord::default(),
        }
    }

    pub fn cancelled(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            status: SubagentStatus::Cancelled,
            output: String::new(),
            steps_used: 0,
            usage: UsageRecord::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_carries_the_given_fields() {
        let usage = UsageRecord { input_tokens: 3, ..Default::default() };
        let result = SubagentResult::completed("a1", "done", 4, usage);
        assert_eq!(result.status, SubagentStatus::Completed);
        assert_eq!(result.output, "done");
        assert_eq!(result.steps_used, 4);
        assert_eq!(result.usage.input_tokens, 3);
    }

    #[test]
    fn failed_has_zero_usage_and_error_text() {
        let result = SubagentResult::failed("a2", "boom");
        assert_eq!(result.status, SubagentStatus::Failed);
        assert_eq!(result.output, "boom");
        assert_eq!(result.usage.total(), 0);
    }
}
