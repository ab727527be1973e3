//! Configuration controlling the behavior of the agent loop (`wisp-loop`).

use serde::Deserialize;
use serde::Serialize;

/// Bounds and thresholds the agent loop enforces.
///
/// All fields are `#[serde(default)]` so a partially-specified config file
/// is legal; unset fields fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopControlConfig {
    /// Maximum model/tool steps within a single turn.
    #[serde(default = "default_max_steps_per_turn")]
    pub max_steps_per_turn: u32,
    /// Maximum retry attempts for a single retryable model-call failure.
    #[serde(default = "default_max_retries_per_step")]
    pub max_retries_per_step: u32,
    /// Fraction of `max_context_size` at which compaction is triggered.
    #[serde(default = "default_auto_compact_threshold")]
    pub auto_compact_threshold: f64,
    /// Ralph-mode iteration bound.
    ///
    /// `0` disables Ralph mode. `-1` means "run until cancelled". Any other
    /// negative value is rejected by [`LoopControlConfig::validate`].
    #[serde(default)]
    pub max_ralph_iterations: i32,
    /// Optional wall-clock bound for Ralph mode, independent of the
    /// iteration count.
    #[serde(with = "humantime_serde", default)]
    pub max_ralph_duration: Option<std::time::Duration>,
}

fn default_max_steps_per_turn() -> u32 {
    100
}

fn default_max_retries_per_step() -> u32 {
    3
}

fn default_auto_compact_threshold() -> f64 {
    0.8
}

impl Default for LoopControlConfig {
    fn default() -> Self {
        Self {
            max_steps_per_turn: default_max_steps_per_turn(),
            max_retries_per_step: default_max_retries_per_step(),
            auto_compact_threshold: default_auto_compact_threshold(),
            max_ralph_iterations: 0,
            max_ralph_duration: None,
        }
    }
}

/// A single configuration field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid loop_control config: {0}")]
pub struct LoopControlConfigError(String);

impl LoopControlConfig {
    /// Checks the invariants this crate's consumers rely on but that serde
    /// cannot express: `auto_compact_threshold` in [0.1, 1.0], and
    /// `max_ralph_iterations >= -1`.
    pub fn validate(&self) -> Result<(), LoopControlConfigError> {
        if !(0.1..=1.0).contains(&self.auto_compact_threshold) {
            return Err(LoopControlConfigError(format!(
                "auto_compact_threshold must be within [0.1, 1.0], got {}",
                self.auto_compact_threshold
            )));
        }
        if self.max_ralph_iterations < -1 {
            return Err(LoopControlConfigError(format!(
                "max_ralph_iterations must be >= -1, got {}",
                self.max_ralph_iterations
            )));
        }
        if self.max_steps_per_turn == 0 {
            return Err(LoopControlConfigError(
                "max_steps_per_turn must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether Ralph mode (the Turn-loop-wrapping-Turn-loop behavior) is
    /// active for this configuration.
    pub fn ralph_enabled(&self) -> bool {
        self.max_ralph_iterations != 0
    }

    /// Whether Ralph mode should keep iterating given the iterations run so
    /// far. `-1` never stops on count; the caller is expected to also check
    /// `max_ralph_duration` and any cancellation token.
    pub fn ralph_should_continue(&self, iterations_run: u32) -> bool {
        match self.max_ralph_iterations {
            0 => false,
            -1 => true,
            n => (iterations_run as i32) < n,
        }
    }
}

#[cfg(test)]
#[path = "loop_config.test.rs"]
mod tests;
