//! The core [`Message`] type that flows through context, compaction and the
//! model client.

use serde::Deserialize;
use serde::Serialize;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    Tool,
    System,
}

/// A single content part within a [`Message`].
///
/// Unknown tags decode into [`ContentPart::Unknown`] rather than failing, so
/// a session file written by a newer build still loads on an older one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    /// Model chain-of-thought. Stripped before being sent to a model that
    /// did not produce it, and before compaction (see `wisp-compaction`).
    Thought { text: String },
    ImageUrl { url: String },
    AudioUrl { url: String },
    VideoUrl { url: String },
    ToolCall(ToolCall),
    #[serde(other)]
    Unknown,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn thought(text: impl Into<String>) -> Self {
        ContentPart::Thought { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_thought(&self) -> bool {
        matches!(self, ContentPart::Thought { .. })
    }
}

/// A tool call emitted by the model within an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Opaque JSON-encoded arguments; the dispatcher parses these against
    /// the tool's own schema.
    pub arguments: String,
}

/// An immutable entry in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentPart>,
    /// Set on a `Role::Tool` message: the id of the call this is a result for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentPart::text(text)],
            tool_call_id: None,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: vec![ContentPart::text(text)],
            tool_call_id: None,
        }
    }

    pub fn assistant(content: Vec<ContentPart>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: vec![ContentPart::text(text)],
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Tool calls carried by this message, if it is an assistant message.
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.content
            .iter()
            .filter_map(|p| match p {
                ContentPart::ToolCall(tc) => Some(tc),
                _ => None,
            })
            .collect()
    }

    /// A copy of this message with all [`ContentPart::Thought`] parts removed.
    pub fn without_thoughts(&self) -> Self {
        Self {
            role: self.role,
            content: self
                .content
                .iter()
                .filter(|p| !p.is_thought())
                .cloned()
                .collect(),
            tool_call_id: self.tool_call_id.clone(),
        }
    }

    /// Concatenation of all text parts, for compaction summaries and logs.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|p| p.as_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
#[path = "message.test.rs"]
mod tests;
