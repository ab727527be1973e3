//! In-memory history bookkeeping on top of [`wisp_protocol::Message`].
//!
//! `wisp-context` owns persistence; this crate owns the in-memory shape and
//! the invariants that persistence must preserve (tool-call pairing,
//! monotonic checkpoints, ordered append).

mod factory;
mod history;
mod tracked;
mod usage;

pub use factory::assistant_with_tool_calls;
pub use factory::synthetic_cancelled_result;
pub use factory::system_message;
pub use factory::tool_result_message;
pub use factory::user_message;
pub use history::MessageHistory;
pub use tracked::TrackedMessage;
pub use usage::UsageRecord;
