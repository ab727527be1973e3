//! [`ApprovalGate`]: yolo flag + auto-approve set + persistence.

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tokio::sync::Mutex;
use wisp_wire::ApprovalReply;
use wisp_wire::EngineSide;
use wisp_wire::WireReply;
use wisp_wire::WireRequest;

use crate::ApprovalError;

/// Key identifying one auto-approvable action, e.g. `"Shell:run command"`.
fn auto_approve_key(tool_name: &str, action: &str) -> String {
    format!("{tool_name}:{action}")
}

/// Decides whether a tool call may proceed without (further) user
/// confirmation, and remembers past "always allow" decisions.
pub struct ApprovalGate {
    yolo: AtomicBool,
    auto_approved: Mutex<HashSet<String>>,
    persistence_path: Option<PathBuf>,
}

#[derive(serde::Serialize, serde::Deserialize, Default)]
struct PersistedApprovals {
    auto_approved: Vec<String>,
}

impl ApprovalGate {
    pub fn new() -> Self {
        Self {
            yolo: AtomicBool::new(false),
            auto_approved: Mutex::new(HashSet::new()),
            persistence_path: None,
        }
    }

    /// Loads a previously persisted auto-approve set from `path`, creating
    /// the gate in yolo-off state. A missing file is not an error.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, ApprovalError> {
        let path = path.into();
        let auto_approved = if path.exists() {
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| ApprovalError::Load {
                    path: path.display().to_string(),
                    source,
                })?;
            let parsed: PersistedApprovals = serde_json::from_str(&content)
                .map_err(|source| ApprovalError::Corrupt {
                    path: path.display().to_string(),
                    source,
                })?;
            parsed.auto_approved.into_iter().collect()
        } else {
            HashSet::new()
        };
        Ok(Self {
            yolo: AtomicBool::new(false),
            auto_approved: Mutex::new(auto_approved),
            persistence_path: Some(path),
        })
    }

    pub fn set_yolo(&self, enabled: bool) {
        self.yolo.store(enabled, Ordering::Relaxed);
    }

    pub fn is_yolo(&self) -> bool {
        self.yolo.load(Ordering::Relaxed)
    }

    /// Asks whether `tool_name`'s `action` may proceed. `description` and
    /// `display` are forwarded to the UI only if a prompt is actually needed.
    pub async fn request(
        &self,
        wire: &EngineSide,
        tool_name: &str,
        action: &str,
        description: &str,
    ) -> Result<bool, ApprovalError> {
        if self.is_yolo() {
            return Ok(true);
        }

        let key = auto_approve_key(tool_name, action);
        if self.auto_approved.lock().await.contains(&key) {
            return Ok(true);
        }

        let request = WireRequest::approval(tool_name, action, description);
        let reply = wire
            .request(request)
            .await
            .map_err(|_| ApprovalError::WireDisconnected)?;

        match reply {
            WireReply::Approval(ApprovalReply::Approve) => Ok(true),
            WireReply::Approval(ApprovalReply::ApproveAndRemember) => {
                self.auto_approved.lock().await.insert(key);
                self.persist().await?;
                Ok(true)
            }
            WireReply::Approval(ApprovalReply::Reject) | WireReply::Answers(_) => Ok(false),
        }
    }

    async fn persist(&self) -> Result<(), ApprovalError> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };
        let snapshot = PersistedApprovals {
            auto_approved: self.auto_approved.lock().await.iter().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&snapshot).unwrap_or_default();
        write_atomic(path, &json)
            .await
            .map_err(|source| ApprovalError::Persist {
                path: path.display().to_string(),
                source,
            })
    }
}

impl Default for ApprovalGate {
    fn default() -> Self {
        Self::new()
    }
}

async fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    tokio::fs::write(&tmp_path, content).await?;
    tokio::fs::rename(&tmp_path, path).await
}

#[cfg(test)]
#[path = "gate.test.rs"]
mod tests;
