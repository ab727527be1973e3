//! Bidirectional engine-to-UI requests.

use serde::Deserialize;
use serde::Serialize;

/// The UI's answer to an [`crate::WireEvent`]-adjacent approval prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalReply {
    Approve,
    ApproveAndRemember,
    Reject,
}

/// A request the engine sends that blocks on a UI reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireRequestKind {
    Approval {
        tool_name: String,
        action: String,
        description: String,
    },
    Question {
        questions: Vec<String>,
    },
}

/// The response type carried back over the Wire for a given request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireReply {
    Approval(ApprovalReply),
    Answers(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRequest {
    pub id: String,
    pub kind: WireRequestKind,
}

impl WireRequest {
    pub fn approval(tool_name: impl Into<String>, action: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: uuid_like_id(),
            kind: WireRequestKind::Approval {
                tool_name: tool_name.into(),
                action: action.into(),
                description: description.into(),
            },
        }
    }

    pub fn question(questions: Vec<String>) -> Self {
        Self {
            id: uuid_like_id(),
            kind: WireRequestKind::Question { questions },
        }
    }
}

/// Small counter-based id generator, kept dependency-free since `wisp-wire`
/// does not otherwise need `uuid`: ids only need to be unique within one
/// process's lifetime of pending requests.
fn uuid_like_id() -> String {
    use std::sync::atomic::AtomicU64;
    use std::sync::atomic::Ordering;
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!("req-{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}
