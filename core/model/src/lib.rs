//! The Model Client: streams model output as a sequence of parts, reports
//! usage, and classifies errors as retryable or fatal.
//!
//! Split between [`Model`] (identity/capability metadata) and [`ApiClient`]
//! (the transport that actually performs a streaming call), so a provider
//! integration only has to implement the transport while the descriptor
//! stays a plain data type.

mod client;
mod doubles;
mod error;
mod part;
mod sanitize;
mod schema;

pub use client::ApiClient;
pub use client::Model;
pub use client::PartStream;
pub use client::StaticModel;
pub use doubles::EchoApiClient;
pub use doubles::RecordingApiClient;
pub use doubles::ScriptedApiClient;
pub use doubles::ScriptedResponse;
pub use error::ModelError;
pub use part::FinishReason;
pub use part::ModelPart;
pub use sanitize::prepare_history;
pub use schema::inline_refs;
