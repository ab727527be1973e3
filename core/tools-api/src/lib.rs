//! The surface tool handlers are written against: [`ToolContext`] and the
//! [`Injector`] it carries.
//!
//! Kept as its own crate (rather than folded into `wisp-tools`) because
//! subagents and the dispatcher both need this surface without depending on
//! the full tool registry.

mod context;
mod injector;

pub use context::ToolContext;
pub use injector::Injector;
