//! [`BackgroundTaskStore`]: bookkeeping for subagents spawned with
//! `run_in_background=true`, polled later via `TaskOutput(agent_id)`.
//!
//! Grounded on the teacher's `BackgroundTaskStore`/`SubagentStores` pair,
//! collapsed to the single piece this system's loop needs directly: `Task`
//! registers an entry before spawning, the spawned turn reports its result
//! in, and `TaskOutput` polls it. Transcript/session-scoped registry
//! lifetime is handled by `wisp-session`, not here.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use crate::SubagentResult;
use crate::SubagentStatus;

#[derive(Debug, Clone)]
enum Entry {
    Running,
    Done(SubagentResult),
}

/// Thread-safe table of background subagent tasks, keyed by agent id.
#[derive(Debug, Default)]
pub struct BackgroundTaskStore {
    tasks: RwLock<HashMap<String, Entry>>,
}

impl BackgroundTaskStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a task as running. Called by `Task` right before spawning,
    /// so a `TaskOutput` poll that races the spawn still finds an entry.
    pub fn mark_running(&self, agent_id: impl Into<String>) {
        self.tasks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(agent_id.into(), Entry::Running);
    }

    /// Records the final result, overwriting the running marker.
    pub fn complete(&self, result: SubagentResult) {
        self.tasks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(result.agent_id.clone(), Entry::Done(result));
    }

    /// `None` if `agent_id` was never registered; `Some(None)` if still
    /// running; `Some(Some(result))` once finished. Modeled as a single
    /// `Option<SubagentStatus>` for the common "is it done yet" check plus
    /// `take_result` for the actual payload.
    pub fn status(&self, agent_id: &str) -> Option<SubagentStatus> {
        match self.tasks.read().unwrap_or_else(|e| e.into_inner()).get(agent_id)? {
            Entry::Running => Some(SubagentStatus::Running),
            Entry::Done(result) => Some(result.status),
        }
    }

    /// Removes and returns the result if the task has finished; leaves a
    /// running task untouched so a later poll still observes it.
    pub fn take_result(&self, agent_id: &str) -> Option<SubagentResult> {
        let mut tasks = self.tasks.write().unwrap_or_else(|e| e.into_inner());
        match tasks.get(agent_id) {
            Some(Entry::Done(_)) => match tasks.remove(agent_id) {
                Some(Entry::Done(result)) => Some(result),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_agent_has_no_status() {
        let store = BackgroundTaskStore::new();
        assert!(store.status("nope").is_none());
    }

    #[test]
    fn running_then_completed_transition() {
        let store = BackgroundTaskStore::new();
        store.mark_running("a1");
        assert_eq!(store.status("a1"), Some(SubagentStatus::Running));
        assert!(store.take_result("a1").is_none());

        store.complete(SubagentResult::completed("a1", "done", 2, Default::default()));
        assert_eq!(store.status("a1"), Some(SubagentStatus::Completed));
    }

    #[test]
    fn take_result_removes_entry_once() {
        let store = BackgroundTaskStore::new();
        store.complete(SubagentResult::completed("a2", "done", 1, Default::default()));
        assert!(store.take_result("a2").is_some());
        assert!(store.take_result("a2").is_none());
        assert!(store.status("a2").is_none());
    }
}
