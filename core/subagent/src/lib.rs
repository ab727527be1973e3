//! The Subagent Market: named agent declarations, their tiered tool
//! access, and bookkeeping for background-spawned runs.
//!
//! This crate holds data and policy only — `Task`/`CreateSubagent`/
//! `TaskOutput` themselves are implemented in `wisp-loop`, where a running
//! `Soul` is available to actually spawn a child turn loop.

mod background;
mod definition;
mod market;
mod result;
mod status;
mod tool_filter;

pub use background::BackgroundTaskStore;
pub use definition::AgentDefinition;
pub use definition::AgentSource;
pub use definition::ToolAccess;
pub use market::SubagentMarket;
pub use result::SubagentResult;
pub use status::SubagentStatus;
pub use tool_filter::ToolFilter;
pub use tool_filter::DYNAMIC_BLOCKED_TOOLS;
