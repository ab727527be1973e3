//! The Tool Registry + Dispatcher: the 5-stage pipeline every tool call runs
//! through, and a handful of illustrative built-in tools.

pub mod builtin;
mod dispatch;
mod error;
mod registry;
mod tool;

pub use dispatch::DispatchOutcome;
pub use dispatch::DispatchResult;
pub use dispatch::dispatch;
pub use error::Result;
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use tool::Tool;

// Re-exported so downstream crates only need one `use` for the common case
// of implementing a `Tool`.
pub use wisp_tools_api::ToolContext;
