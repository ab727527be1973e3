//! [`ToolContext`]: everything a tool handler may observe or touch.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use wisp_approval::ApprovalGate;
use wisp_wire::EngineSide;

use crate::Injector;

/// Passed by mutable reference to `execute`, and by shared reference to
/// `check_permission`/`post_process`/`cleanup`.
pub struct ToolContext {
    workspace_root: PathBuf,
    wire: Arc<EngineSide>,
    approval: Arc<ApprovalGate>,
    cancellation: CancellationToken,
    injector: Injector,
}

impl ToolContext {
    pub fn new(
        workspace_root: impl Into<PathBuf>,
        wire: Arc<EngineSide>,
        approval: Arc<ApprovalGate>,
        cancellation: CancellationToken,
        injector: Injector,
    ) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            wire,
            approval,
            cancellation,
            injector,
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn wire(&self) -> &EngineSide {
        &self.wire
    }

    pub fn approval(&self) -> &ApprovalGate {
        &self.approval
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
