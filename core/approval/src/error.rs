use wisp_error::ErrorExt;
use wisp_error::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApprovalError {
    #[error("failed to persist auto-approve set to {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read auto-approve set from {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("auto-approve set at {path} is not valid JSON: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("the wire endpoint disconnected while awaiting an approval reply")]
    WireDisconnected,
}

impl ErrorExt for ApprovalError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApprovalError::Persist { .. } | ApprovalError::Load { .. } => StatusCode::IoError,
            ApprovalError::Corrupt { .. } => StatusCode::InvalidJson,
            ApprovalError::WireDisconnected => StatusCode::Cancelled,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
