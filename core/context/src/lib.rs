//! The Context Store: an append-only, checkpointed, token-tracked session
//! log backed by a newline-delimited JSON file on disk.

mod error;
mod record;
mod store;

pub use error::ContextError;
pub use record::SessionRecord;
pub use store::ContextStore;
