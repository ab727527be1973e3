//! [`ContextStore`]: the durable, append-only Context Store.

use std::path::Path;
use std::path::PathBuf;

use tokio::fs::File;
use tokio::fs::OpenOptions;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::sync::Mutex;
use wisp_message::MessageHistory;
use wisp_message::UsageRecord;
use wisp_protocol::Message;

use crate::ContextError;
use crate::SessionRecord;

/// An append-only session log backed by a file, with an in-memory
/// [`MessageHistory`] kept in sync with every successful write.
///
/// Appends are serialized through an internal lock even though a
/// `ContextStore` is expected to have a single owner — tool handlers that
/// hold a reference and append reentrantly (e.g. a subagent result handler)
/// must not interleave writes.
pub struct ContextStore {
    path: PathBuf,
    history: MessageHistory,
    writer: Mutex<Option<File>>,
}

impl ContextStore {
    /// Opens (creating if absent) the session file at `path` and replays it
    /// into memory.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, ContextError> {
        let path = path.into();
        let history = if path.exists() {
            Self::load_from(&path).await?
        } else {
            MessageHistory::new()
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| ContextError::Write {
                path: path.display().to_string(),
                source,
            })?;
        let mut store = Self {
            path,
            history,
            writer: Mutex::new(Some(file)),
        };
        store.complete_orphaned_tool_calls().await?;
        Ok(store)
    }

    /// Implements the loader side of Invariant 1: a turn that was cancelled
    /// (e.g. a crash) between appending an assistant message's tool_calls
    /// and their results leaves orphaned tool_call ids in the reloaded
    /// history. Rather than send those upstream unpaired, complete each
    /// with a synthetic cancelled result before this store is used.
    async fn complete_orphaned_tool_calls(&mut self) -> Result<(), ContextError> {
        for id in self.history.orphaned_tool_call_ids() {
            let message = wisp_message::synthetic_cancelled_result(id, "turn was interrupted before this tool call completed");
            self.append(message).await?;
        }
        Ok(())
    }

    /// An in-memory-only store, for tests and subagents whose transcript is
    /// never materialized to disk.
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            history: MessageHistory::new(),
            writer: Mutex::new(None),
        }
    }

    async fn load_from(path: &Path) -> Result<MessageHistory, ContextError> {
        let file = File::open(path).await.map_err(|source| ContextError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut lines = BufReader::new(file).lines();
        let mut history = MessageHistory::new();
        let mut line_no = 0usize;
        while let Some(line) = lines.next_line().await.map_err(|source| ContextError::Read {
            path: path.display().to_string(),
            source,
        })? {
            line_no += 1;
            let record = match SessionRecord::from_line(&line, line_no) {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!(line = line_no, error = %err, "skipping corrupt session record");
                    continue;
                }
            };
            match record {
                Some(SessionRecord::Message(m)) => {
                    history.append(m);
                }
                Some(SessionRecord::Usage(u)) => history.append_usage(u),
                Some(SessionRecord::Checkpoint { .. }) => {
                    history.checkpoint();
                }
                None => {}
            }
        }
        // Drop a trailing orphaned tool message: truncation or corruption
        // that lost the assistant message but kept its tool result should
        // never surface an unpaired tool message to the model.
        if history.drop_trailing_unpaired_tool_result() {
            tracing::warn!(path = %path.display(), "dropped a trailing tool result with no matching assistant tool_call");
        }
        Ok(history)
    }

    async fn append_line(&self, line: String) -> Result<(), ContextError> {
        let mut guard = self.writer.lock().await;
        if let Some(file) = guard.as_mut() {
            file.write_all(line.as_bytes())
                .await
                .map_err(|source| ContextError::Write {
                    path: self.path.display().to_string(),
                    source,
                })?;
            file.write_all(b"\n").await.map_err(|source| ContextError::Write {
                path: self.path.display().to_string(),
                source,
            })?;
            file.flush().await.map_err(|source| ContextError::Write {
                path: self.path.display().to_string(),
                source,
            })?;
        }
        Ok(())
    }

    pub async fn append(&mut self, message: Message) -> Result<(), ContextError> {
        let line = SessionRecord::Message(message.clone()).to_line()?;
        self.append_line(line).await?;
        self.history.append(message);
        Ok(())
    }

    pub async fn append_usage(&mut self, usage: UsageRecord) -> Result<(), ContextError> {
        let line = SessionRecord::Usage(usage).to_line()?;
        self.append_line(line).await?;
        self.history.append_usage(usage);
        Ok(())
    }

    pub async fn checkpoint(&mut self) -> Result<u64, ContextError> {
        let id = self.history.checkpoint();
        let line = SessionRecord::Checkpoint { id }.to_line()?;
        self.append_line(line).await?;
        Ok(id)
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    pub fn token_count(&self) -> u64 {
        self.history.token_count()
    }

    pub fn n_checkpoints(&self) -> u64 {
        self.history.n_checkpoints()
    }

    pub fn latest_usage(&self) -> Option<UsageRecord> {
        self.history.latest_usage()
    }

    /// Rewrites the backing file to contain only messages for which `keep`
    /// returns true, via write-to-temp + rename. Checkpoint and usage
    /// bookkeeping survive the rewrite (see [`Self::rewrite_from_history`]).
    pub async fn filter(&mut self, keep: impl Fn(&Message) -> bool) -> Result<(), ContextError> {
        self.history.filter(&keep);
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        self.rewrite_from_history().await
    }

    /// Replaces the entire on-disk and in-memory history, used by the
    /// compaction engine to install a summarized history.
    pub async fn replace_all(&mut self, messages: Vec<Message>) -> Result<(), ContextError> {
        self.history.replace_all(messages);
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        self.rewrite_from_history().await
    }

    /// Writes one record line plus its trailing newline to `tmp`.
    async fn write_record_line(tmp: &mut File, tmp_path: &Path, line: &str) -> Result<(), ContextError> {
        tmp.write_all(line.as_bytes()).await.map_err(|source| ContextError::Write {
            path: tmp_path.display().to_string(),
            source,
        })?;
        tmp.write_all(b"\n").await.map_err(|source| ContextError::Write {
            path: tmp_path.display().to_string(),
            source,
        })
    }

    /// Rewrites the backing file to a temp path, then atomically renames it
    /// into place. Re-emits every `_checkpoint` record (interleaved right
    /// before the first surviving message that falls under it, matching
    /// where it would have landed had the file never been rewritten) plus a
    /// trailing `_usage` line for the latest usage snapshot, so reload
    /// reconstructs both `token_count` and `n_checkpoints` (§4.A, §8
    /// Round-trip/Monotonicity).
    async fn rewrite_from_history(&mut self) -> Result<(), ContextError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let tmp_path = dir.join(format!(
            ".{}.tmp",
            self.path.file_name().and_then(|n| n.to_str()).unwrap_or("session")
        ));
        let mut tmp = File::create(&tmp_path).await.map_err(|source| ContextError::Write {
            path: tmp_path.display().to_string(),
            source,
        })?;

        let n_checkpoints = self.history.n_checkpoints();
        let mut next_checkpoint_to_emit = 0u64;
        for tracked in self.history.history() {
            if let Some(id) = tracked.checkpoint_id {
                while next_checkpoint_to_emit <= id {
                    let line = SessionRecord::Checkpoint { id: next_checkpoint_to_emit }.to_line()?;
                    Self::write_record_line(&mut tmp, &tmp_path, &line).await?;
                    next_checkpoint_to_emit += 1;
                }
            }
            let line = SessionRecord::Message(tracked.message.clone()).to_line()?;
            Self::write_record_line(&mut tmp, &tmp_path, &line).await?;
        }
        // Checkpoints created after the last surviving message (or when no
        // message survived at all) still need to count toward `n_checkpoints`.
        while next_checkpoint_to_emit < n_checkpoints {
            let line = SessionRecord::Checkpoint { id: next_checkpoint_to_emit }.to_line()?;
            Self::write_record_line(&mut tmp, &tmp_path, &line).await?;
            next_checkpoint_to_emit += 1;
        }
        if let Some(usage) = self.history.latest_usage() {
            let line = SessionRecord::Usage(usage).to_line()?;
            Self::write_record_line(&mut tmp, &tmp_path, &line).await?;
        }

        tmp.flush().await.map_err(|source| ContextError::Write {
            path: tmp_path.display().to_string(),
            source,
        })?;
        drop(tmp);
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(ContextError::Rename)?;

        let new_file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|source| ContextError::Write {
                path: self.path.display().to_string(),
                source,
            })?;
        *self.writer.lock().await = Some(new_file);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "store.test.rs"]
mod tests;
