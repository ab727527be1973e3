//! Unidirectional engine-to-UI events.

use serde::Deserialize;
use serde::Serialize;
use wisp_protocol::ToolOutput;

/// Why a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    NoToolCalls,
    ToolRejected,
    MaxStepsReached,
    Cancelled,
    FatalError,
}

/// One event emitted on the Wire by the agent loop.
///
/// Structural events (`StepBegin`, `ToolResult`, ...) are never reordered
/// relative to each other; `Text`/`Thought` deltas for the same stream may
/// be coalesced by a UI running in "merge" mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireEvent {
    TurnBegin { user_input: String },
    TurnEnd { outcome: TurnOutcome },
    StepBegin { step: u32 },
    Text { delta: String },
    Thought { delta: String },
    ToolCallDelta { call_id: String, name: Option<String>, argument_chunk: String },
    ToolCallComplete { call_id: String },
    ToolResult { call_id: String, output: ToolOutput },
    StatusUpdate { context_tokens: u64, max_context_tokens: u64 },
    PreviewChange { description: String },
    #[serde(other)]
    Unknown,
}
