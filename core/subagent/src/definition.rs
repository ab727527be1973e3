//! [`AgentDefinition`]: the declaration a subagent is built from.

/// Which tools a subagent's toolset is drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolAccess {
    /// Every tool the parent registers, subject to [`crate::ToolFilter`]'s
    /// tiered restrictions.
    All,
    /// Exactly this set, further narrowed by [`crate::ToolFilter`].
    List(Vec<String>),
}

impl ToolAccess {
    pub fn allows(&self, tool_name: &str) -> bool {
        match self {
            ToolAccess::All => true,
            ToolAccess::List(names) => names.iter().any(|n| n == tool_name),
        }
    }
}

/// Where a definition came from, used by [`crate::ToolFilter`] to decide
/// whether the stricter non-builtin tier applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentSource {
    /// Declared ahead of time at agent construction (e.g. `Explore`,
    /// `Plan`, a project's `.wisp/agents/*.toml`).
    Fixed,
    /// Created at runtime via `CreateSubagent`.
    Dynamic,
}

/// A named subagent declaration: system prompt, model override, and the
/// tools it is allowed to see.
#[derive(Debug, Clone)]
pub struct AgentDefinition {
    pub name: String,
    pub description: String,
    pub system_prompt: String,
    pub tools: ToolAccess,
    pub disallowed_tools: Vec<String>,
    pub source: AgentSource,
    /// Overrides the parent's active model for this subagent's own turns,
    /// if set.
    pub model_override: Option<String>,
    /// Overrides `loop_control.max_steps_per_turn` for this subagent's
    /// turns, if set.
    pub max_steps_override: Option<u32>,
}

impl AgentDefinition {
    pub fn fixed(name: impl Into<String>, description: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            system_prompt: system_prompt.into(),
            tools: ToolAccess::All,
            disallowed_tools: Vec::new(),
            source: AgentSource::Fixed,
            model_override: None,
            max_steps_override: None,
        }
    }

    pub fn dynamic(name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            system_prompt: system_prompt.into(),
            tools: ToolAccess::All,
            disallowed_tools: Vec::new(),
            source: AgentSource::Dynamic,
            model_override: None,
            max_steps_override: None,
        }
    }

    pub fn with_tools(mut self, tools: ToolAccess) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_disallowed(mut self, disallowed: Vec<String>) -> Self {
        self.disallowed_tools = disallowed;
        self
    }
}
