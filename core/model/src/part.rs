//! The stream items an [`crate::ApiClient`] yields.

use wisp_message::UsageRecord;

/// Why a model stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    ToolCalls,
    Length,
    Error,
}

/// One item of a model's streamed response.
#[derive(Debug, Clone)]
pub enum ModelPart {
    TextDelta(String),
    /// Chain-of-thought. The agent loop accumulates these separately from
    /// `TextDelta` and strips them before sending history back to a model
    /// that did not produce them.
    ThoughtDelta(String),
    ToolCallDelta { id: String, name: Option<String>, argument_chunk: String },
    ToolCallComplete { id: String },
    Finish(FinishReason),
    Usage(UsageRecord),
}
