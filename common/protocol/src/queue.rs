//! Queue and steering types for user input arriving while a turn is running.
//!
//! Two mechanisms exist:
//!
//! 1. **Queued commands**: visible input submitted while a turn is in
//!    progress. Held in FIFO order and consumed as new turns once the
//!    current one reaches `Idle`.
//! 2. **Steering attachments**: hidden guidance injected as meta messages
//!    that the model sees but that never appear in the user-facing history.

use serde::Deserialize;
use serde::Serialize;

/// A visible queued command, submitted while the loop is mid-turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserQueuedCommand {
    pub id: String,
    pub prompt: String,
    /// Unix milliseconds.
    pub queued_at: i64,
}

impl UserQueuedCommand {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            queued_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn preview(&self, max_len: usize) -> String {
        if self.prompt.len() <= max_len {
            self.prompt.clone()
        } else {
            format!("{}...", &self.prompt[..max_len])
        }
    }
}

/// Origin of a [`SteeringAttachment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteeringSource {
    User,
    Hook,
    System,
}

impl SteeringSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SteeringSource::User => "user",
            SteeringSource::Hook => "hook",
            SteeringSource::System => "system",
        }
    }
}

impl std::fmt::Display for SteeringSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hidden guidance injected mid-turn as a meta message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteeringAttachment {
    pub id: String,
    pub prompt: String,
    pub source: SteeringSource,
    pub queued_at: i64,
}

impl SteeringAttachment {
    pub fn user(prompt: impl Into<String>) -> Self {
        Self::with_source(prompt, SteeringSource::User)
    }

    pub fn hook(prompt: impl Into<String>) -> Self {
        Self::with_source(prompt, SteeringSource::Hook)
    }

    pub fn system(prompt: impl Into<String>) -> Self {
        Self::with_source(prompt, SteeringSource::System)
    }

    fn with_source(prompt: impl Into<String>, source: SteeringSource) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            source,
            queued_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
#[path = "queue.test.rs"]
mod tests;
