//! Errors raised while discovering or resolving session files.

use wisp_error::ErrorExt;
use wisp_error::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to access sessions directory {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// `--continue` was requested but no prior session exists in the
    /// sessions directory (exit code 2, per the "usage error" class).
    #[error("no prior session found in {0}")]
    NoPriorSession(String),
}

impl ErrorExt for SessionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SessionError::Io { .. } => StatusCode::IoError,
            SessionError::NoPriorSession(_) => StatusCode::FileNotFound,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
