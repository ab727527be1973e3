//! A durable, append-only log of [`WireEvent`]s for post-hoc replay.
//!
//! Requests are never recorded: a replay viewer has no UI to answer them,
//! and the approval decision already shows up as the resulting `ToolResult`
//! event.

use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use tokio::fs::File;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::event::WireEvent;

#[derive(Serialize)]
struct SideLogLine<'a> {
    kind: &'static str,
    payload: &'a WireEvent,
}

pub struct SideLog {
    file: File,
}

impl SideLog {
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let file = OpenOptions::new().create(true).append(true).open(path).await?;
        Ok(Self { file })
    }

    pub async fn record(&mut self, event: &WireEvent) -> Result<(), std::io::Error> {
        let line = SideLogLine { kind: event_kind(event), payload: event };
        let json = serde_json::to_string(&line).unwrap_or_else(|_| "{}".to_string());
        self.file.write_all(json.as_bytes()).await?;
        self.file.write_all(b"\n").await?;
        self.file.flush().await
    }

    pub fn path(path: &str) -> PathBuf {
        PathBuf::from(path)
    }
}

fn event_kind(event: &WireEvent) -> &'static str {
    match event {
        WireEvent::TurnBegin { .. } => "turn_begin",
        WireEvent::TurnEnd { .. } => "turn_end",
        WireEvent::StepBegin { .. } => "step_begin",
        WireEvent::Text { .. } => "text",
        WireEvent::Thought { .. } => "thought",
        WireEvent::ToolCallDelta { .. } => "tool_call_delta",
        WireEvent::ToolCallComplete { .. } => "tool_call_complete",
        WireEvent::ToolResult { .. } => "tool_result",
        WireEvent::StatusUpdate { .. } => "status_update",
        WireEvent::PreviewChange { .. } => "preview_change",
        WireEvent::Unknown => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn record_appends_one_json_line_per_event() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("side.jsonl");
        let mut log = SideLog::create(&path).await.expect("create");
        log.record(&WireEvent::TurnBegin { user_input: "hi".into() })
            .await
            .expect("record");
        log.record(&WireEvent::StepBegin { step: 1 }).await.expect("record");

        let content = tokio::fs::read_to_string(&path).await.expect("read");
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().next().expect("line").contains("turn_begin"));
    }
}
