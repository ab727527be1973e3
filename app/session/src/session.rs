//! [`Session`]: metadata about one agent conversation, distinct from the
//! [`wisp_context::ContextStore`] that holds its actual history.

use std::path::PathBuf;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Metadata for an agent session. Does not hold conversation history; that
/// lives in the [`wisp_context::ContextStore`] opened at the session's file
/// path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub working_dir: PathBuf,
    /// Id of the model selected for this session, if one is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Ephemeral sessions are never written under the sessions directory
    /// (the caller uses `ContextStore::in_memory` for them).
    #[serde(default)]
    pub ephemeral: bool,
}

impl Session {
    /// A fresh session with a newly generated id.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), working_dir)
    }

    /// A session resuming a known id, e.g. one picked by `--continue`.
    pub fn with_id(id: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            created_at: now,
            last_activity_at: now,
            working_dir: working_dir.into(),
            model_id: None,
            max_turns: None,
            title: None,
            ephemeral: false,
        }
    }

    pub fn builder(working_dir: impl Into<PathBuf>) -> SessionBuilder {
        SessionBuilder::new(working_dir)
    }

    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn age_secs(&self) -> i64 {
        (Utc::now() - self.created_at).num_seconds()
    }

    pub fn idle_secs(&self) -> i64 {
        (Utc::now() - self.last_activity_at).num_seconds()
    }
}

/// Builder for [`Session`], mirroring the construction options a CLI front
/// end needs to set before the agent loop starts.
#[derive(Debug)]
pub struct SessionBuilder {
    working_dir: PathBuf,
    id: Option<String>,
    model_id: Option<String>,
    max_turns: Option<u32>,
    title: Option<String>,
    ephemeral: bool,
}

impl SessionBuilder {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            id: None,
            model_id: None,
            max_turns: None,
            title: None,
            ephemeral: false,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    pub fn build(self) -> Session {
        let mut session = match self.id {
            Some(id) => Session::with_id(id, self.working_dir),
            None => Session::new(self.working_dir),
        };
        session.model_id = self.model_id;
        session.max_turns = self.max_turns;
        session.title = self.title;
        session.ephemeral = self.ephemeral;
        session
    }
}

#[cfg(test)]
#[path = "session.test.rs"]
mod tests;
