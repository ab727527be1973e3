//! Extension trait shared by every crate's error enum.

use std::fmt;

use crate::StatusCode;

/// Lets a caller classify any error without matching on its concrete type.
pub trait ErrorExt: std::error::Error {
    /// The status code this error maps to.
    fn status_code(&self) -> StatusCode;

    /// Whether a caller may retry the operation that produced this error.
    fn is_retryable(&self) -> bool {
        self.status_code().is_retryable()
    }

    /// The message safe to show outside the process boundary.
    ///
    /// Internal errors hide their detail behind a generic message so stack
    /// traces and file paths never leak to a model or a remote UI.
    fn output_msg(&self) -> String {
        if matches!(self.status_code(), StatusCode::Internal | StatusCode::Unknown) {
            "an internal error occurred".to_string()
        } else {
            self.to_string()
        }
    }

    fn as_any(&self) -> &dyn std::any::Any;
}

/// A minimal [`ErrorExt`] implementor for call sites that only have a
/// message and a status code, without a crate-specific enum variant to use.
#[derive(Debug)]
pub struct PlainError {
    message: String,
    code: StatusCode,
}

impl PlainError {
    pub fn new(message: impl Into<String>, code: StatusCode) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Wraps an [`std::io::Error`] as a [`PlainError`] under the given code.
    pub fn boxed(err: std::io::Error, code: StatusCode) -> Self {
        Self::new(err.to_string(), code)
    }
}

impl fmt::Display for PlainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PlainError {}

impl ErrorExt for PlainError {
    fn status_code(&self) -> StatusCode {
        self.code
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
#[path = "ext.test.rs"]
mod tests;
