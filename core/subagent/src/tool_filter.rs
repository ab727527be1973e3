//! [`ToolFilter`]: the tiered tool-access check applied to a subagent's
//! toolset, grounded on the teacher's `ALWAYS_BLOCKED_TOOLS`/`ToolFilter`
//! split, adapted so recursive spawning is a per-definition choice (an
//! agent definition may include `Task` in its tool list) rather than a
//! blanket ban, per this system's "isolated recursion" design (§4.I).

use crate::AgentDefinition;
use crate::AgentSource;
use crate::ToolAccess;

/// Tools blocked for any `Dynamic`-sourced subagent (created at runtime via
/// `CreateSubagent`), mirroring the teacher's non-builtin tier: a prompt
/// cannot hand a just-created agent the ability to mutate the filesystem or
/// run shell commands.
pub const DYNAMIC_BLOCKED_TOOLS: &[&str] = &["Write", "Edit", "Shell", "NotebookEdit"];

/// The per-invocation tool-access check for one subagent.
#[derive(Debug, Clone)]
pub struct ToolFilter {
    allowed: ToolAccess,
    disallowed: Vec<String>,
    source: AgentSource,
}

impl ToolFilter {
    pub fn new(definition: &AgentDefinition) -> Self {
        Self {
            allowed: definition.tools.clone(),
            disallowed: definition.disallowed_tools.clone(),
            source: definition.source,
        }
    }

    pub fn is_allowed(&self, tool_name: &str) -> bool {
        self.rejection_reason(tool_name).is_none()
    }

    pub fn rejection_reason(&self, tool_name: &str) -> Option<String> {
        if self.source == AgentSource::Dynamic && DYNAMIC_BLOCKED_TOOLS.contains(&tool_name) {
            return Some(format!("'{tool_name}' is blocked for dynamically created subagents"));
        }
        if self.disallowed.iter().any(|d| d == tool_name) {
            return Some(format!("'{tool_name}' is explicitly disallowed for this agent"));
        }
        if !self.allowed.allows(tool_name) {
            return Some(format!("'{tool_name}' is not in this agent's tool list"));
        }
        None
    }

    pub fn filter_tools<'a>(&self, tools: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
        tools.filter(|t| self.is_allowed(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_agent_may_include_task_for_recursion() {
        let def = AgentDefinition::fixed("general", "general purpose", "do anything")
            .with_tools(ToolAccess::List(vec!["Task".to_string(), "Read".to_string()]));
        let filter = ToolFilter::new(&def);
        assert!(filter.is_allowed("Task"));
        assert!(filter.is_allowed("Read"));
        assert!(!filter.is_allowed("Write"));
    }

    #[test]
    fn dynamic_agent_cannot_write_or_edit_even_if_listed() {
        let def = AgentDefinition::dynamic("scratch", "summarize things")
            .with_tools(ToolAccess::List(vec!["Write".to_string(), "Read".to_string()]));
        let filter = ToolFilter::new(&def);
        assert!(!filter.is_allowed("Write"));
        assert!(filter.is_allowed("Read"));
    }

    #[test]
    fn explicit_disallow_overrides_all_access() {
        let def = AgentDefinition::fixed("explore", "read-only exploration", "look around")
            .with_tools(ToolAccess::All)
            .with_disallowed(vec!["Task".to_string()]);
        let filter = ToolFilter::new(&def);
        assert!(!filter.is_allowed("Task"));
        assert!(filter.is_allowed("Read"));
    }

    #[test]
    fn rejection_reason_explains_the_tier() {
        let def = AgentDefinition::dynamic("scratch", "prompt");
        let filter = ToolFilter::new(&def);
        let reason = filter.rejection_reason("Shell").expect("blocked");
        assert!(reason.contains("dynamically created"));
    }
}
