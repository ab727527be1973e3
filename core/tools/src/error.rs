//! Errors a tool handler may return.

use wisp_error::ErrorExt;
use wisp_error::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("tool not found: {name}")]
    NotFound { name: String },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("execution failed: {message}")]
    ExecutionFailed { message: String },

    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("timeout after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("aborted: {reason}")]
    Aborted { reason: String },

    #[error("io error: {0}")]
    Io(#[source] std::io::Error),

    #[error("internal error: {message}")]
    Internal { message: String },

    #[error("cancelled")]
    Cancelled,
}

impl ToolError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ToolError::InvalidInput { message: message.into() }
    }

    pub fn is_retriable(&self) -> bool {
        matches!(self, ToolError::Timeout { .. } | ToolError::Io(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ToolError::Cancelled)
    }

    pub fn to_output_message(&self) -> String {
        self.to_string()
    }
}

impl ErrorExt for ToolError {
    fn status_code(&self) -> StatusCode {
        match self {
            ToolError::NotFound { .. } => StatusCode::ToolNotFound,
            ToolError::InvalidInput { .. } => StatusCode::InvalidArguments,
            ToolError::ExecutionFailed { .. } => StatusCode::ToolExecutionFailed,
            ToolError::PermissionDenied { .. } => StatusCode::PermissionDenied,
            ToolError::Timeout { .. } => StatusCode::Timeout,
            ToolError::Aborted { .. } => StatusCode::Cancelled,
            ToolError::Io(_) => StatusCode::IoError,
            ToolError::Internal { .. } => StatusCode::Internal,
            ToolError::Cancelled => StatusCode::Cancelled,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::Io(err)
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::InvalidInput { message: format!("JSON error: {err}") }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_and_io_are_retriable() {
        assert!(ToolError::Timeout { timeout_secs: 5 }.is_retriable());
        assert!(ToolError::Io(std::io::Error::other("x")).is_retriable());
        assert!(!ToolError::NotFound { name: "x".into() }.is_retriable());
    }

    #[test]
    fn cancelled_is_flagged() {
        assert!(ToolError::Cancelled.is_cancelled());
        assert!(!ToolError::Aborted { reason: "x".into() }.is_cancelled());
    }

    #[test]
    fn status_codes_map_as_expected() {
        assert_eq!(ToolError::NotFound { name: "x".into() }.status_code(), StatusCode::ToolNotFound);
        assert_eq!(
            ToolError::PermissionDenied { message: "x".into() }.status_code(),
            StatusCode::PermissionDenied
        );
    }
}
