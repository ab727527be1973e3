//! Errors a slash-command handler may return.

use wisp_error::ErrorExt;
use wisp_error::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum SlashError {
    #[error("unknown command: /{0}")]
    UnknownCommand(String),

    #[error("invalid arguments for /{command}: {message}")]
    InvalidArguments { command: String, message: String },

    #[error("compaction failed: {0}")]
    CompactionFailed(String),

    #[error("unknown model: {0}")]
    UnknownModel(String),
}

impl ErrorExt for SlashError {
    fn status_code(&self) -> StatusCode {
        match self {
            SlashError::UnknownCommand(_) => StatusCode::InvalidArguments,
            SlashError::InvalidArguments { .. } => StatusCode::InvalidArguments,
            SlashError::CompactionFailed(_) => StatusCode::Internal,
            SlashError::UnknownModel(_) => StatusCode::ModelNotFound,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
