//! Error types for settings and fragment loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading, parsing, or validating config trees.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a config file failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing a JSON5 file failed.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// Parsing a YAML fragment failed.
    #[error("failed to parse yaml fragment: {0}")]
    YamlFailed(#[from] serde_yaml::Error),
    /// Converting JSON values failed.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// The file extension does not map to a known fragment format.
    #[error("unsupported config format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },
    /// A specific field failed validation.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// Generic validation failure.
    #[error("invalid config: {0}")]
    Invalid(String),
}
