//! The FIFO queue of user inputs submitted while a turn is already running
//! (§4.G "Concurrency"): "The queue supports cancel and promote operations
//! on individual pending items."

use std::collections::VecDeque;

use wisp_protocol::UserQueuedCommand;

/// Pending user inputs, oldest first. Each entry carries the id assigned at
/// enqueue time so a caller can target a specific one for `cancel`/`promote`
/// instead of only ever acting on the whole queue or its tail.
#[derive(Debug, Default)]
pub struct PendingInputQueue {
    inputs: VecDeque<UserQueuedCommand>,
}

impl PendingInputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `input`, returning the id assigned to it.
    pub fn push(&mut self, input: String) -> String {
        let command = UserQueuedCommand::new(input);
        let id = command.id.clone();
        self.inputs.push_back(command);
        id
    }

    pub fn pop(&mut self) -> Option<String> {
        self.inputs.pop_front().map(|c| c.prompt)
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Pending items in queue order, for surfacing to the UI.
    pub fn pending(&self) -> impl Iterator<Item = &UserQueuedCommand> {
        self.inputs.iter()
    }

    /// Drops every queued input, used when the in-flight turn is cancelled
    /// and queued follow-ups no longer make sense (e.g. the user hit Ctrl-C
    /// to abandon the whole exchange, not just the current turn).
    pub fn cancel_all(&mut self) {
        self.inputs.clear();
    }

    /// Removes the queued item with id `id`, wherever it sits in the queue.
    /// Returns `false` if no such item is pending.
    pub fn cancel(&mut self, id: &str) -> bool {
        let before = self.inputs.len();
        self.inputs.retain(|c| c.id != id);
        self.inputs.len() != before
    }

    /// Moves the queued item with id `id` to the front, so it runs next
    /// regardless of arrival order (e.g. a clarifying answer the UI wants
    /// prioritized over earlier queued follow-ups). Returns `false` if no
    /// such item is pending.
    pub fn promote(&mut self, id: &str) -> bool {
        let Some(index) = self.inputs.iter().position(|c| c.id == id) else {
            return false;
        };
        if let Some(command) = self.inputs.remove(index) {
            self.inputs.push_front(command);
        }
        true
    }

    /// Moves the most recently queued input to the front. Convenience for
    /// callers that want "promote the latest" without tracking its id.
    pub fn promote_last(&mut self) {
        if let Some(last) = self.inputs.pop_back() {
            self.inputs.push_front(last);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_fifo_order() {
        let mut queue = PendingInputQueue::new();
        queue.push("first".to_string());
        queue.push("second".to_string());
        assert_eq!(queue.pop(), Some("first".to_string()));
        assert_eq!(queue.pop(), Some("second".to_string()));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn cancel_all_empties_the_queue() {
        let mut queue = PendingInputQueue::new();
        queue.push("a".to_string());
        queue.push("b".to_string());
        queue.cancel_all();
        assert!(queue.is_empty());
    }

    #[test]
    fn cancel_removes_only_the_matching_item() {
        let mut queue = PendingInputQueue::new();
        queue.push("a".to_string());
        let b_id = queue.push("b".to_string());
        queue.push("c".to_string());

        assert!(queue.cancel(&b_id));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some("a".to_string()));
        assert_eq!(queue.pop(), Some("c".to_string()));
    }

    #[test]
    fn cancel_unknown_id_is_a_no_op() {
        let mut queue = PendingInputQueue::new();
        queue.push("a".to_string());
        assert!(!queue.cancel("does-not-exist"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn promote_moves_the_named_item_to_the_front() {
        let mut queue = PendingInputQueue::new();
        queue.push("a".to_string());
        queue.push("b".to_string());
        let c_id = queue.push("c".to_string());

        assert!(queue.promote(&c_id));
        assert_eq!(queue.pop(), Some("c".to_string()));
        assert_eq!(queue.pop(), Some("a".to_string()));
        assert_eq!(queue.pop(), Some("b".to_string()));
    }

    #[test]
    fn promote_unknown_id_is_a_no_op() {
        let mut queue = PendingInputQueue::new();
        queue.push("a".to_string());
        assert!(!queue.promote("does-not-exist"));
        assert_eq!(queue.pop(), Some("a".to_string()));
    }

    #[test]
    fn promote_last_moves_newest_to_front() {
        let mut queue = PendingInputQueue::new();
        queue.push("a".to_string());
        queue.push("b".to_string());
        queue.push("c".to_string());
        queue.promote_last();
        assert_eq!(queue.pop(), Some("c".to_string()));
        assert_eq!(queue.pop(), Some("a".to_string()));
        assert_eq!(queue.pop(), Some("b".to_string()));
    }

    #[test]
    fn promote_last_on_empty_queue_is_a_no_op() {
        let mut queue = PendingInputQueue::new();
        queue.promote_last();
        assert!(queue.is_empty());
    }
}
