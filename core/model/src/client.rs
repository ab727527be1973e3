//! [`Model`] (identity/capability metadata) and [`ApiClient`] (transport).

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use wisp_protocol::Message;

use crate::ModelError;
use crate::ModelPart;

/// A boxed, owned stream of model parts. Finite and non-restartable: once
/// consumed (or dropped), a caller must request a fresh stream to retry.
pub type PartStream = Pin<Box<dyn Stream<Item = Result<ModelPart, ModelError>> + Send>>;

/// Static identity and capability metadata for a model, independent of how
/// it is actually called.
pub trait Model: Send + Sync {
    fn id(&self) -> &str;
    fn max_context_tokens(&self) -> u64;
    fn supports_thinking(&self) -> bool {
        false
    }
}

/// A concrete, pluggable description of a model, for configs that don't need
/// a custom [`Model`] implementation.
#[derive(Debug, Clone)]
pub struct StaticModel {
    pub id: String,
    pub max_context_tokens: u64,
    pub supports_thinking: bool,
}

impl Model for StaticModel {
    fn id(&self) -> &str {
        &self.id
    }
    fn max_context_tokens(&self) -> u64 {
        self.max_context_tokens
    }
    fn supports_thinking(&self) -> bool {
        self.supports_thinking
    }
}

/// The transport that performs a streaming model call.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Issues one streaming call. `tools` is the JSON schema list the model
    /// is allowed to call; `history` is the conversation so far.
    async fn stream(
        &self,
        system_prompt: &str,
        tools: &[serde_json::Value],
        history: &[Message],
    ) -> Result<PartStream, ModelError>;
}
