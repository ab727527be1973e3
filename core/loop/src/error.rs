//! Top-level error type for the agent loop, wrapping the failure modes of
//! everything it orchestrates.

use wisp_compaction::CompactionError;
use wisp_context::ContextError;
use wisp_error::ErrorExt;
use wisp_error::StatusCode;
use wisp_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum LoopError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Compaction(#[from] CompactionError),
    #[error("the turn was cancelled")]
    Cancelled,
}

impl ErrorExt for LoopError {
    fn status_code(&self) -> StatusCode {
        match self {
            LoopError::Model(err) => err.status_code(),
            LoopError::Context(err) => err.status_code(),
            LoopError::Compaction(err) => err.status_code(),
            LoopError::Cancelled => StatusCode::Cancelled,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
