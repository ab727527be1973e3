//! A handful of illustrative built-in tools.
//!
//! The full tool catalogue (shell execution, patch application, web fetch,
//! MCP bridging) is out of scope; these two exist to exercise the
//! dispatcher's pipeline end to end and to give subagent definitions
//! something concrete to reference.

mod read_file;
mod write_todos;

pub use read_file::ReadFileTool;
pub use write_todos::TodoStatus;
pub use write_todos::WriteTodosTool;
