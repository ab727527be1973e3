//! Errors raised by the Context Store.

use wisp_error::ErrorExt;
use wisp_error::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to read session file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write session file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to rename temp file during rewrite: {0}")]
    Rename(#[source] std::io::Error),

    #[error("record at line {line} is not valid JSON: {source}")]
    CorruptRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ErrorExt for ContextError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContextError::Read { .. } | ContextError::Write { .. } | ContextError::Rename(_) => {
                StatusCode::IoError
            }
            ContextError::CorruptRecord { .. } => StatusCode::CorruptRecord,
            ContextError::Serialize(_) => StatusCode::InvalidJson,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
