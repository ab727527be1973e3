//! Layered TOML configuration (§9 "Config"): built-in defaults, overridden
//! by a user-level file, overridden by a project-level file, overridden by
//! explicit environment variables. All file-shape fields are optional so a
//! partial file is legal; unknown top-level keys are tolerated by `toml`'s
//! default (non-`deny_unknown_fields`) behavior, matching the SessionFile's
//! own forward-compatibility policy.

mod error;

use std::path::Path;
use std::path::PathBuf;

pub use error::ConfigError;
use serde::Deserialize;
use serde::Serialize;
use wisp_protocol::LoopControlConfig;

/// Directory name used under the user's home directory and under a project
/// root to hold `config.toml` and, by default, session files.
pub const CONFIG_DIR_NAME: &str = ".wisp";

/// Environment variable pointing at an alternate home directory, checked
/// before `dirs::home_dir()`.
pub const HOME_OVERRIDE_ENV: &str = "WISP_HOME";

/// Resolved configuration, with every field defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct WispConfig {
    pub default_model: Option<String>,
    pub default_thinking: bool,
    pub compact_strategy: String,
    pub sessions_dir: Option<PathBuf>,
    pub loop_control: LoopControlConfig,
}

impl Default for WispConfig {
    fn default() -> Self {
        Self {
            default_model: None,
            default_thinking: false,
            compact_strategy: "simple".to_string(),
            sessions_dir: None,
            loop_control: LoopControlConfig::default(),
        }
    }
}

/// The on-disk shape of `config.toml`: every field optional, so a layer
/// only overrides what it actually sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigToml {
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub default_thinking: Option<bool>,
    #[serde(default)]
    pub compact_strategy: Option<String>,
    #[serde(default)]
    pub sessions_dir: Option<PathBuf>,
    #[serde(default)]
    pub max_steps_per_turn: Option<u32>,
    #[serde(default)]
    pub max_retries_per_step: Option<u32>,
    #[serde(default)]
    pub auto_compact_threshold: Option<f64>,
    #[serde(default)]
    pub max_ralph_iterations: Option<i32>,
    #[serde(default, with = "humantime_serde::option")]
    pub max_ralph_duration: Option<std::time::Duration>,
}

impl WispConfig {
    /// Applies every field `layer` actually sets on top of `self`,
    /// overwriting the defaults (or a previous, lower-precedence layer).
    fn apply(&mut self, layer: ConfigToml) {
        if let Some(v) = layer.default_model {
            self.default_model = Some(v);
        }
        if let Some(v) = layer.default_thinking {
            self.default_thinking = v;
        }
        if let Some(v) = layer.compact_strategy {
            self.compact_strategy = v;
        }
        if let Some(v) = layer.sessions_dir {
            self.sessions_dir = Some(v);
        }
        if let Some(v) = layer.max_steps_per_turn {
            self.loop_control.max_steps_per_turn = v;
        }
        if let Some(v) = layer.max_retries_per_step {
            self.loop_control.max_retries_per_step = v;
        }
        if let Some(v) = layer.auto_compact_threshold {
            self.loop_control.auto_compact_threshold = v;
        }
        if let Some(v) = layer.max_ralph_iterations {
            self.loop_control.max_ralph_iterations = v;
        }
        if let Some(v) = layer.max_ralph_duration {
            self.loop_control.max_ralph_duration = Some(v);
        }
    }
}

/// `home_dir()` the caller wants used, overridable for tests without
/// touching the real user home.
fn resolve_home_dir() -> PathBuf {
    if let Ok(custom) = std::env::var(HOME_OVERRIDE_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// The default config directory: `$WISP_HOME/.wisp` or `~/.wisp`.
pub fn default_config_dir() -> PathBuf {
    resolve_home_dir().join(CONFIG_DIR_NAME)
}

/// Loads configuration layered as defaults < user-level file
/// (`default_config_dir()/config.toml`) < project-level file
/// (`project_dir/.wisp/config.toml`) < a handful of `WISP_CONFIG_*`
/// environment variables.
///
/// A missing file at either layer is not an error; a present-but-malformed
/// file is.
pub fn load_layered(project_dir: &Path) -> Result<WispConfig, ConfigError> {
    let mut config = WispConfig::default();
    if let Some(layer) = read_layer(&default_config_dir().join("config.toml"))? {
        config.apply(layer);
    }
    if let Some(layer) = read_layer(&project_dir.join(CONFIG_DIR_NAME).join("config.toml"))? {
        config.apply(layer);
    }
    config.apply(env_layer());
    Ok(config)
}

fn read_layer(path: &Path) -> Result<Option<ConfigToml>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let text =
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
    let layer: ConfigToml = toml::from_str(&text).map_err(|source| ConfigError::Parse { source })?;
    tracing::debug!(path = %path.display(), "loaded config layer");
    Ok(Some(layer))
}

/// `WISP_CONFIG_DEFAULT_MODEL`, `WISP_CONFIG_DEFAULT_THINKING`,
/// `WISP_CONFIG_COMPACT_STRATEGY` are the only fields exposed through the
/// environment; numeric tuning knobs are file-only.
fn env_layer() -> ConfigToml {
    let mut layer = ConfigToml::default();
    if let Ok(v) = std::env::var("WISP_CONFIG_DEFAULT_MODEL") {
        layer.default_model = Some(v);
    }
    if let Ok(v) = std::env::var("WISP_CONFIG_DEFAULT_THINKING") {
        layer.default_thinking = v.parse().ok();
    }
    if let Ok(v) = std::env::var("WISP_CONFIG_COMPACT_STRATEGY") {
        layer.compact_strategy = Some(v);
    }
    layer
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
