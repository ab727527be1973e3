//! [`MessageHistory`]: the in-memory ordered log `wisp-context` persists.

use std::collections::HashSet;

use wisp_protocol::Message;
use wisp_protocol::Role;

use crate::TrackedMessage;
use crate::UsageRecord;

/// An ordered, append-only sequence of messages with checkpoint and token
/// bookkeeping.
///
/// This type owns no I/O; `wisp-context` wraps it with a `SessionFile` that
/// persists every mutation.
#[derive(Debug, Clone, Default)]
pub struct MessageHistory {
    messages: Vec<TrackedMessage>,
    next_checkpoint_id: u64,
    current_checkpoint: Option<u64>,
    latest_usage: Option<UsageRecord>,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message, returning the [`TrackedMessage`] that was stored.
    pub fn append(&mut self, message: Message) -> &TrackedMessage {
        let seq = self.messages.len() as u64;
        let tracked = TrackedMessage::new(seq, message, self.current_checkpoint);
        self.messages.push(tracked);
        // `&TrackedMessage` return keeps callers from needing a second lookup.
        self.messages.last().expect("just pushed")
    }

    /// Records a new usage snapshot, updating `token_count` to its total.
    pub fn append_usage(&mut self, usage: UsageRecord) {
        self.latest_usage = Some(usage);
    }

    /// Inserts a checkpoint boundary and returns its id. Ids are strictly
    /// increasing.
    pub fn checkpoint(&mut self) -> u64 {
        let id = self.next_checkpoint_id;
        self.next_checkpoint_id += 1;
        self.current_checkpoint = Some(id);
        id
    }

    pub fn n_checkpoints(&self) -> u64 {
        self.next_checkpoint_id
    }

    pub fn history(&self) -> &[TrackedMessage] {
        &self.messages
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().map(|t| &t.message)
    }

    pub fn token_count(&self) -> u64 {
        self.latest_usage.map(|u| u.total()).unwrap_or(0)
    }

    /// The most recently appended usage record, if any. `wisp-context` needs
    /// the full breakdown (not just the total) to re-emit a `_usage` line
    /// when rewriting the backing file.
    pub fn latest_usage(&self) -> Option<UsageRecord> {
        self.latest_usage
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Rewrites the history, keeping only messages for which `keep` returns
    /// true. Checkpoint and usage bookkeeping are untouched; callers that
    /// want to reset token accounting should call [`Self::reset_tokens`]
    /// afterward (compaction does this explicitly).
    pub fn filter(&mut self, keep: impl Fn(&Message) -> bool) {
        let mut seq = 0u64;
        self.messages.retain_mut(|tracked| {
            let keep_this = keep(&tracked.message);
            if keep_this {
                tracked.seq = seq;
                seq += 1;
            }
            keep_this
        });
    }

    pub fn reset_tokens(&mut self, tokens: u64) {
        self.latest_usage = Some(UsageRecord {
            input_tokens: tokens,
            ..UsageRecord::default()
        });
    }

    /// Replaces the entire history (used by compaction to install the
    /// summarized history) while preserving checkpoint counters.
    pub fn replace_all(&mut self, messages: Vec<Message>) {
        self.messages = messages
            .into_iter()
            .enumerate()
            .map(|(i, m)| TrackedMessage::new(i as u64, m, self.current_checkpoint))
            .collect();
    }

    /// Tool-call ids from assistant messages with no matching tool result
    /// yet appended. Used by the loop to synthesize cancellation results and
    /// by the loader to validate Invariant 1.
    pub fn orphaned_tool_call_ids(&self) -> Vec<String> {
        let mut pending: Vec<String> = Vec::new();
        let mut satisfied: HashSet<String> = HashSet::new();
        for tracked in &self.messages {
            match tracked.message.role {
                Role::Assistant => {
                    for call in tracked.message.tool_calls() {
                        pending.push(call.id.clone());
                    }
                }
                Role::Tool => {
                    if let Some(id) = &tracked.message.tool_call_id {
                        satisfied.insert(id.clone());
                    }
                }
                _ => {}
            }
        }
        pending.into_iter().filter(|id| !satisfied.contains(id)).collect()
    }

    /// Drops a trailing tool message whose `tool_call_id` matches no
    /// assistant tool_call anywhere in this history. This only arises from
    /// file corruption or truncation (an assistant message lost, its tool
    /// result surviving) since a tool message is otherwise never appended
    /// without its preceding assistant call. Returns `true` if a message
    /// was dropped.
    pub fn drop_trailing_unpaired_tool_result(&mut self) -> bool {
        let Some(last) = self.messages.last() else {
            return false;
        };
        if last.message.role != Role::Tool {
            return false;
        }
        let Some(id) = &last.message.tool_call_id else {
            return false;
        };
        let has_call = self
            .messages
            .iter()
            .any(|tracked| tracked.message.role == Role::Assistant && tracked.message.tool_calls().iter().any(|c| &c.id == id));
        if has_call {
            return false;
        }
        self.messages.pop();
        true
    }
}

#[cfg(test)]
#[path = "history.test.rs"]
mod tests;
