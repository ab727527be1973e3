//! In-process [`ApiClient`] doubles for exercising the agent loop without a
//! live provider. No live HTTP provider integration ships in this crate
//! (out of scope); a real integration implements [`ApiClient`] the same way
//! these doubles do.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;
use wisp_message::UsageRecord;
use wisp_protocol::Message;

use crate::ApiClient;
use crate::ModelError;
use crate::ModelPart;
use crate::PartStream;
use crate::part::FinishReason;

/// Always responds with the same fixed text and a `Stop` finish reason.
///
/// Useful for scenario 1 in the testable-properties list: a single-step
/// text reply with no tool calls.
pub struct EchoApiClient {
    reply: String,
}

impl EchoApiClient {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

#[async_trait]
impl ApiClient for EchoApiClient {
    async fn stream(
        &self,
        _system_prompt: &str,
        _tools: &[serde_json::Value],
        _history: &[Message],
    ) -> Result<PartStream, ModelError> {
        let parts = vec![
            Ok(ModelPart::TextDelta(self.reply.clone())),
            Ok(ModelPart::Usage(UsageRecord {
                input_tokens: 10,
                output_tokens: (self.reply.len() as u64).max(1),
                ..Default::default()
            })),
            Ok(ModelPart::Finish(FinishReason::Stop)),
        ];
        Ok(Box::pin(stream::iter(parts)))
    }
}

/// A queue of scripted responses, popped one per call. Lets a test script
/// a sequence like "503, 503, success" to exercise the loop's retry policy,
/// or a multi-step tool-call conversation.
pub struct ScriptedApiClient {
    responses: Mutex<std::collections::VecDeque<ScriptedResponse>>,
}

pub enum ScriptedResponse {
    Parts(Vec<ModelPart>),
    Error(ModelError),
}

impl ScriptedApiClient {
    pub fn new(responses: Vec<ScriptedResponse>) -> Self {
        Self { responses: Mutex::new(responses.into_iter().collect()) }
    }

    pub fn shared(responses: Vec<ScriptedResponse>) -> Arc<Self> {
        Arc::new(Self::new(responses))
    }
}

#[async_trait]
impl ApiClient for ScriptedApiClient {
    async fn stream(
        &self,
        _system_prompt: &str,
        _tools: &[serde_json::Value],
        _history: &[Message],
    ) -> Result<PartStream, ModelError> {
        let next = {
            let mut guard = self.responses.lock().unwrap_or_else(|e| e.into_inner());
            guard.pop_front()
        };
        match next {
            None => Err(ModelError::MalformedResponse("scripted response queue exhausted".into())),
            Some(ScriptedResponse::Error(err)) => Err(err),
            Some(ScriptedResponse::Parts(parts)) => {
                let items: Vec<Result<ModelPart, ModelError>> = parts.into_iter().map(Ok).collect();
                Ok(Box::pin(stream::iter(items)))
            }
        }
    }
}

/// Records the `history` it is called with and always replies with fixed
/// text. Lets a test assert on what the loop actually sent the model (e.g.
/// that thought parts were stripped before the call).
pub struct RecordingApiClient {
    reply: String,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl RecordingApiClient {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), calls: Mutex::new(Vec::new()) }
    }

    /// The `history` argument of every call so far, in call order.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ApiClient for RecordingApiClient {
    async fn stream(
        &self,
        _system_prompt: &str,
        _tools: &[serde_json::Value],
        history: &[Message],
    ) -> Result<PartStream, ModelError> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(history.to_vec());
        let parts = vec![
            Ok(ModelPart::TextDelta(self.reply.clone())),
            Ok(ModelPart::Finish(FinishReason::Stop)),
        ];
        Ok(Box::pin(stream::iter(parts)))
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn echo_client_replies_with_configured_text() {
        let client = EchoApiClient::new("hi there");
        let mut stream = client.stream("sys", &[], &[]).await.expect("stream");
        let mut texts = Vec::new();
        while let Some(part) = stream.next().await {
            if let ModelPart::TextDelta(t) = part.expect("part") {
                texts.push(t);
            }
        }
        assert_eq!(texts, vec!["hi there".to_string()]);
    }

    #[tokio::test]
    async fn scripted_client_pops_in_order_including_errors() {
        let client = ScriptedApiClient::new(vec![
            ScriptedResponse::Error(ModelError::HttpStatus { status: 503, message: "busy".into() }),
            ScriptedResponse::Parts(vec![ModelPart::TextDelta("ok".into()), ModelPart::Finish(FinishReason::Stop)]),
        ]);

        let first = client.stream("sys", &[], &[]).await;
        assert!(first.is_err());

        let mut second = client.stream("sys", &[], &[]).await.expect("second call succeeds");
        let mut saw_ok = false;
        while let Some(part) = second.next().await {
            if let ModelPart::TextDelta(t) = part.expect("part") {
                saw_ok = t == "ok";
            }
        }
        assert!(saw_ok);
    }

    #[tokio::test]
    async fn exhausted_queue_returns_malformed_response_error() {
        let client = ScriptedApiClient::new(vec![]);
        let result = client.stream("sys", &[], &[]).await;
        assert!(result.is_err());
    }
}
