//! Session-file discovery (§5 "Shared resources", §9 "Exit codes"):
//! concurrent sessions over the same work directory get distinct session
//! files identified by a fresh id, unless `--continue` selects the most
//! recent one.

use std::path::Path;
use std::path::PathBuf;

use crate::SessionError;

/// Extension used for on-disk session files, matching
/// `wisp_context::ContextStore`'s newline-delimited JSON format.
pub const SESSION_FILE_EXTENSION: &str = "jsonl";

/// The default sessions directory: `<config dir>/sessions`.
pub fn default_sessions_dir() -> PathBuf {
    wisp_config::default_config_dir().join("sessions")
}

/// Path a session with id `id` is stored at under `dir`.
pub fn session_file_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.{SESSION_FILE_EXTENSION}"))
}

/// Every session id currently on disk under `dir`, each paired with its
/// file's last-modified time. A nonexistent directory yields an empty list
/// rather than an error (no sessions have been created yet).
pub async fn list_session_ids(dir: &Path) -> Result<Vec<(String, std::time::SystemTime)>, SessionError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(SessionError::Io { path: dir.display().to_string(), source }),
    };

    let mut sessions = Vec::new();
    loop {
        let entry = entries.next_entry().await.map_err(|source| SessionError::Io { path: dir.display().to_string(), source })?;
        let Some(entry) = entry else { break };
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(SESSION_FILE_EXTENSION) {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else { continue };
        let metadata = entry.metadata().await.map_err(|source| SessionError::Io { path: path.display().to_string(), source })?;
        let modified = metadata.modified().unwrap_or(std::time::UNIX_EPOCH);
        sessions.push((id.to_string(), modified));
    }
    Ok(sessions)
}

/// The id of the most recently modified session under `dir`, if any.
pub async fn most_recent_session_id(dir: &Path) -> Result<Option<String>, SessionError> {
    let sessions = list_session_ids(dir).await?;
    Ok(sessions.into_iter().max_by_key(|(_, modified)| *modified).map(|(id, _)| id))
}

/// Resolves the session id a CLI front end should use: a fresh id when
/// `continue_session` is false, or the most recently modified session under
/// `dir` when true. Returns [`SessionError::NoPriorSession`] (a usage
/// error, exit code 2) if `continue_session` is true and `dir` has none.
pub async fn resolve_session_id(dir: &Path, continue_session: bool) -> Result<String, SessionError> {
    if !continue_session {
        return Ok(uuid::Uuid::new_v4().to_string());
    }
    most_recent_session_id(dir).await?.ok_or_else(|| SessionError::NoPriorSession(dir.display().to_string()))
}

#[cfg(test)]
#[path = "discovery.test.rs"]
mod tests;
