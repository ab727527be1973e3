//! Errors from loading layered configuration.

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("failed to parse config file: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },
}
