//! [`SoulControl`]: the surface a slash-command handler may act on.
//!
//! Defined in this crate (not `wisp-loop`) so the dependency runs one way:
//! `wisp-loop` depends on `wisp-slash` and implements this trait for its
//! `Soul`, rather than `wisp-slash` depending back on the loop.

use async_trait::async_trait;

use crate::SlashError;

/// A point-in-time snapshot of context usage, for `/context` and `/stats`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextStats {
    pub token_count: u64,
    pub max_context_tokens: u64,
    pub message_count: usize,
    pub checkpoint_count: u64,
}

impl ContextStats {
    pub fn usage_fraction(&self) -> f64 {
        if self.max_context_tokens == 0 {
            0.0
        } else {
            self.token_count as f64 / self.max_context_tokens as f64
        }
    }
}

/// Everything a slash-command handler is allowed to mutate or observe on the
/// soul that is running it.
///
/// Every method runs while the agent loop is `Idle` (per §4.H); a handler is
/// atomic with respect to the loop by construction, since nothing else calls
/// these methods concurrently.
#[async_trait]
pub trait SoulControl: Send {
    /// Replaces the current history with a compacted one, optionally guided
    /// by a user-supplied instruction (`/compact <instruction>`).
    async fn compact(&mut self, instruction: Option<String>) -> Result<(), SlashError>;

    /// Switches the active model by its configured id.
    fn set_model(&mut self, model_id: &str) -> Result<(), SlashError>;

    /// Enables or disables chain-of-thought requests for models that
    /// support them.
    fn set_thinking(&mut self, enabled: bool);

    /// Enables or disables YOLO mode on the soul's Approval Gate.
    fn set_yolo(&mut self, enabled: bool);

    /// A snapshot of current context usage.
    fn context_stats(&self) -> ContextStats;

    /// The ids of models this soul may switch to.
    fn available_models(&self) -> Vec<String>;

    /// Writes a line of informational text to the Wire as a `StatusUpdate`-
    /// adjacent message, for commands that just report something (e.g.
    /// `/stats`) without mutating soul state.
    fn emit_status(&self, text: &str);
}
