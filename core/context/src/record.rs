//! The three record kinds that make up a session file line, per the
//! external session-file format: message, `_usage`, `_checkpoint`.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use wisp_message::UsageRecord;
use wisp_protocol::Message;

use crate::ContextError;

/// One line of a session file.
#[derive(Debug, Clone)]
pub enum SessionRecord {
    Message(Message),
    Usage(UsageRecord),
    Checkpoint { id: u64 },
}

#[derive(Serialize, Deserialize)]
struct UsageWire {
    role: String,
    token_count: u64,
    input: u64,
    output: u64,
    cache_read: u64,
    cache_creation: u64,
}

#[derive(Serialize, Deserialize)]
struct CheckpointWire {
    role: String,
    id: u64,
}

impl SessionRecord {
    /// Serializes this record as one JSON line (without the trailing
    /// newline).
    pub fn to_line(&self) -> Result<String, ContextError> {
        let value = match self {
            SessionRecord::Message(m) => {
                serde_json::to_value(m).map_err(ContextError::Serialize)?
            }
            SessionRecord::Usage(u) => serde_json::to_value(UsageWire {
                role: "_usage".to_string(),
                token_count: u.total(),
                input: u.input_tokens,
                output: u.output_tokens,
                cache_read: u.cache_read_tokens,
                cache_creation: u.cache_creation_tokens,
            })
            .map_err(ContextError::Serialize)?,
            SessionRecord::Checkpoint { id } => serde_json::to_value(CheckpointWire {
                role: "_checkpoint".to_string(),
                id: *id,
            })
            .map_err(ContextError::Serialize)?,
        };
        serde_json::to_string(&value).map_err(ContextError::Serialize)
    }

    /// Parses one line. Returns `Ok(None)` for a blank line or an unknown
    /// `role` value, per the session file's forward-compatibility rule:
    /// readers must never refuse to open a file because of an unrecognized
    /// record.
    pub fn from_line(line: &str, line_no: usize) -> Result<Option<Self>, ContextError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(trimmed)
            .map_err(|source| ContextError::CorruptRecord { line: line_no, source })?;

        match value.get("role").and_then(Value::as_str) {
            Some("_usage") => {
                let wire: UsageWire = serde_json::from_value(value)
                    .map_err(|source| ContextError::CorruptRecord { line: line_no, source })?;
                Ok(Some(SessionRecord::Usage(UsageRecord {
                    input_tokens: wire.input,
                    output_tokens: wire.output,
                    cache_read_tokens: wire.cache_read,
                    cache_creation_tokens: wire.cache_creation,
                })))
            }
            Some("_checkpoint") => {
                let wire: CheckpointWire = serde_json::from_value(value)
                    .map_err(|source| ContextError::CorruptRecord { line: line_no, source })?;
                Ok(Some(SessionRecord::Checkpoint { id: wire.id }))
            }
            Some("user") | Some("assistant") | Some("tool") | Some("system") => {
                let message: Message = serde_json::from_value(value)
                    .map_err(|source| ContextError::CorruptRecord { line: line_no, source })?;
                Ok(Some(SessionRecord::Message(message)))
            }
            // Unknown role: skip rather than fail, per the forward
            // compatibility rule in the session-file format.
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_protocol::Message;

    #[test]
    fn message_round_trips() {
        let msg = Message::user("hello");
        let record = SessionRecord::Message(msg);
        let line = record.to_line().expect("serialize");
        let parsed = SessionRecord::from_line(&line, 1).expect("parse").expect("some");
        match parsed {
            SessionRecord::Message(m) => assert_eq!(m.text_content(), "hello"),
            _ => panic!("expected message record"),
        }
    }

    #[test]
    fn usage_round_trips() {
        let usage = UsageRecord {
            input_tokens: 10,
            output_tokens: 5,
            cache_read_tokens: 1,
            cache_creation_tokens: 0,
        };
        let line = SessionRecord::Usage(usage).to_line().expect("serialize");
        let parsed = SessionRecord::from_line(&line, 1).expect("parse").expect("some");
        match parsed {
            SessionRecord::Usage(u) => assert_eq!(u.total(), 16),
            _ => panic!("expected usage record"),
        }
    }

    #[test]
    fn checkpoint_round_trips() {
        let line = SessionRecord::Checkpoint { id: 7 }.to_line().expect("serialize");
        let parsed = SessionRecord::from_line(&line, 1).expect("parse").expect("some");
        match parsed {
            SessionRecord::Checkpoint { id } => assert_eq!(id, 7),
            _ => panic!("expected checkpoint record"),
        }
    }

    #[test]
    fn blank_line_is_skipped() {
        assert!(SessionRecord::from_line("", 1).expect("ok").is_none());
        assert!(SessionRecord::from_line("   ", 2).expect("ok").is_none());
    }

    #[test]
    fn unknown_role_is_skipped_not_failed() {
        let line = r#"{"role":"_future_kind","x":1}"#;
        assert!(SessionRecord::from_line(line, 1).expect("ok").is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SessionRecord::from_line("{not json", 1).is_err());
    }
}
