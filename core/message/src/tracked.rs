//! [`TrackedMessage`]: a [`wisp_protocol::Message`] plus the bookkeeping the
//! history needs but that has no business living in the wire format.

use wisp_protocol::Message;

/// A message together with its position in the history and the checkpoint
/// it falls under, if any.
#[derive(Debug, Clone)]
pub struct TrackedMessage {
    /// Zero-based position in append order. Stable for the lifetime of the
    /// in-memory history; does not survive compaction (the rebuilt history
    /// renumbers from zero).
    pub seq: u64,
    pub message: Message,
    /// The most recent checkpoint id at the time this message was appended,
    /// or `None` if no checkpoint has been created yet.
    pub checkpoint_id: Option<u64>,
}

impl TrackedMessage {
    pub fn new(seq: u64, message: Message, checkpoint_id: Option<u64>) -> Self {
        Self {
            seq,
            message,
            checkpoint_id,
        }
    }
}

#[cfg(test)]
#[path = "tracked.test.rs"]
mod tests;
