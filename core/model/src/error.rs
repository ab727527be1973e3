//! Retryable vs fatal classification for model-call failures.

use wisp_error::ErrorExt;
use wisp_error::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The underlying transport closed mid-read. Grounded in the common
    /// failure mode of a chunked HTTP response getting cut off.
    #[error("connection closed mid-stream: {0}")]
    RemoteProtocolError(String),

    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("http {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("the model rejected the request: {0}")]
    InvalidRequest(String),

    #[error("context window exceeded: {used} tokens against a {limit} token window")]
    ContextWindowExceeded { used: u64, limit: u64 },

    #[error("malformed response from provider: {0}")]
    MalformedResponse(String),
}

impl ModelError {
    /// Per §4.F / §7: RemoteProtocolError, connection/timeout errors, and
    /// HTTP 429/500/502/503 are retryable. Everything else is fatal.
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::RemoteProtocolError(_) | ModelError::ConnectionError(_) | ModelError::Timeout(_) => true,
            ModelError::HttpStatus { status, .. } => matches!(status, 429 | 500 | 502 | 503),
            _ => false,
        }
    }
}

impl ErrorExt for ModelError {
    fn status_code(&self) -> StatusCode {
        match self {
            ModelError::RemoteProtocolError(_) => StatusCode::ProtocolError,
            ModelError::ConnectionError(_) => StatusCode::ConnectionFailed,
            ModelError::Timeout(_) => StatusCode::Timeout,
            ModelError::HttpStatus { status: 429, .. } => StatusCode::RateLimited,
            ModelError::HttpStatus { status, .. } if *status >= 500 => StatusCode::ServiceUnavailable,
            ModelError::HttpStatus { .. } => StatusCode::ProviderError,
            ModelError::AuthenticationFailed(_) => StatusCode::AuthenticationFailed,
            ModelError::InvalidRequest(_) => StatusCode::InvalidArguments,
            ModelError::ContextWindowExceeded { .. } => StatusCode::ContextWindowExceeded,
            ModelError::MalformedResponse(_) => StatusCode::ParseError,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_rate_limit_are_retryable() {
        assert!(ModelError::HttpStatus { status: 429, message: "".into() }.is_retryable());
        assert!(ModelError::HttpStatus { status: 503, message: "".into() }.is_retryable());
        assert!(ModelError::HttpStatus { status: 502, message: "".into() }.is_retryable());
        assert!(!ModelError::HttpStatus { status: 404, message: "".into() }.is_retryable());
        assert!(!ModelError::HttpStatus { status: 401, message: "".into() }.is_retryable());
    }

    #[test]
    fn transport_errors_are_retryable() {
        assert!(ModelError::RemoteProtocolError("cut off".into()).is_retryable());
        assert!(ModelError::ConnectionError("refused".into()).is_retryable());
        assert!(ModelError::Timeout(std::time::Duration::from_secs(30)).is_retryable());
    }

    #[test]
    fn auth_and_context_errors_are_fatal() {
        assert!(!ModelError::AuthenticationFailed("bad key".into()).is_retryable());
        assert!(!ModelError::ContextWindowExceeded { used: 1, limit: 1 }.is_retryable());
    }
}
