//! Errors raised by the Compaction Engine.
//!
//! A compaction failure must never corrupt the live history: the caller
//! is expected to log a warning and continue the turn with the original,
//! uncompacted context.

use wisp_error::ErrorExt;
use wisp_error::StatusCode;
use wisp_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum CompactionError {
    #[error("summarization model call failed: {0}")]
    ModelCall(#[source] ModelError),

    #[error("model returned no text content for the summary")]
    EmptySummary,
}

impl From<ModelError> for CompactionError {
    fn from(source: ModelError) -> Self {
        CompactionError::ModelCall(source)
    }
}

impl ErrorExt for CompactionError {
    fn status_code(&self) -> StatusCode {
        match self {
            CompactionError::ModelCall(source) => source.status_code(),
            CompactionError::EmptySummary => StatusCode::ParseError,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
