//! [`ToolRegistry`]: the immutable set of tools available to one agent.

use std::collections::HashMap;
use std::sync::Arc;

use crate::Tool;

/// Tools registered at agent construction. Immutable for the lifetime of the
/// agent; a subagent is given a different (usually filtered) registry.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// A registry containing only the tools whose name passes `keep`, used
    /// by the Subagent Market to build a filtered child toolset without
    /// cloning each `Arc<dyn Tool>` individually at every call site.
    pub fn filtered(&self, keep: impl Fn(&str) -> bool) -> ToolRegistry {
        ToolRegistry {
            tools: self
                .tools
                .iter()
                .filter(|(name, _)| keep(name))
                .map(|(name, tool)| (name.clone(), tool.clone()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use wisp_protocol::ToolOutput;
    use wisp_tools_api::ToolContext;

    use crate::ToolError;

    struct NoopTool(&'static str);

    #[async_trait]
    impl Tool for NoopTool {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "noop"
        }
        fn input_schema(&self) -> Value {
            serde_json::json!({"type": "object"})
        }
        async fn execute(&self, _input: Value, _ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
            Ok(ToolOutput::empty())
        }
    }

    #[test]
    fn register_and_get_round_trip() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NoopTool("Read")));
        assert!(registry.contains("Read"));
        assert!(registry.get("Read").is_some());
        assert!(registry.get("Write").is_none());
    }

    #[test]
    fn filtered_drops_tools_not_matching_predicate() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NoopTool("Read")));
        registry.register(Arc::new(NoopTool("Task")));
        let filtered = registry.filtered(|name| name != "Task");
        assert!(filtered.contains("Read"));
        assert!(!filtered.contains("Task"));
    }
}
