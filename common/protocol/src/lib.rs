//! Wire-format-agnostic types shared by every core crate.
//!
//! Nothing here knows how to run a loop or call a model; this crate only
//! defines the data that flows between the context store, the dispatcher,
//! the model client and the UI.

mod loop_config;
mod message;
mod queue;
mod tool;

pub use loop_config::LoopControlConfig;
pub use message::ContentPart;
pub use message::Message;
pub use message::Role;
pub use message::ToolCall;
pub use queue::SteeringAttachment;
pub use queue::SteeringSource;
pub use queue::UserQueuedCommand;
pub use tool::ConcurrencySafety;
pub use tool::PermissionResult;
pub use tool::ToolOutput;
pub use tool::ToolResultContent;
pub use tool::ValidationError;
pub use tool::ValidationResult;
