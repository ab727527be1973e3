//! Types shared between the tool trait (`wisp-tools`) and the dispatcher.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Whether a tool may run concurrently with other tool calls in the same step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencySafety {
    /// May run in parallel with other `Safe` tools (e.g. reads).
    #[default]
    Safe,
    /// Must run sequentially relative to every other tool call (e.g. writes,
    /// shell commands).
    Unsafe,
}

/// The result of [`crate::ToolOutput`] validation against a tool's schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { errors: Vec<ValidationError> },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// A single schema-validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    pub path: String,
}

impl ValidationError {
    pub fn with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: path.into(),
        }
    }
}

/// The result of an approval check (`wisp-approval`) for a tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionResult {
    Allowed,
    Denied { reason: String },
}

impl PermissionResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PermissionResult::Allowed)
    }
}

/// The payload a tool hands back to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolResultContent {
    Text(String),
    Structured(Value),
}

impl ToolResultContent {
    /// The string that is actually fed back into the model's history.
    pub fn as_model_text(&self) -> String {
        match self {
            ToolResultContent::Text(t) => t.clone(),
            ToolResultContent::Structured(v) => v.to_string(),
        }
    }
}

/// A block the UI renders for a tool call; kept separate from the text sent
/// back to the model so a tool can show rich output without bloating the
/// conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayBlock {
    Diff { before: String, after: String },
    Code { language: String, content: String },
    Markdown { content: String },
    #[serde(other)]
    Unknown,
}

/// The outcome of one tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: ToolResultContent,
    pub is_error: bool,
    #[serde(default)]
    pub modifiers: Vec<DisplayBlock>,
}

/// Ergonomic constructors for [`ToolOutput`], mirroring the handler-authoring
/// style used throughout `wisp-tools`.
pub trait ToolOutputExt {
    fn text(content: impl Into<String>) -> Self;
    fn structured(value: Value) -> Self;
    fn error(message: impl Into<String>) -> Self;
    fn empty() -> Self;
}

impl ToolOutputExt for ToolOutput {
    fn text(content: impl Into<String>) -> Self {
        Self {
            content: ToolResultContent::Text(content.into()),
            is_error: false,
            modifiers: Vec::new(),
        }
    }

    fn structured(value: Value) -> Self {
        Self {
            content: ToolResultContent::Structured(value),
            is_error: false,
            modifiers: Vec::new(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            content: ToolResultContent::Text(message.into()),
            is_error: true,
            modifiers: Vec::new(),
        }
    }

    fn empty() -> Self {
        Self {
            content: ToolResultContent::Text(String::new()),
            is_error: false,
            modifiers: Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "tool.test.rs"]
mod tests;
