//! Error types for the aggregation core.

use crate::render::RenderError;
use requirekit_config::ConfigError;
use thiserror::Error;

/// Errors returned by aggregation, derivation, and rendering.
#[derive(Debug, Error)]
pub enum RequireKitError {
    /// A fragment or settings file could not be read, parsed, or validated.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// The renderer failed to produce the runtime script.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    /// Plugin id is unknown to the registry.
    #[error("unknown plugin: {0}")]
    UnknownPlugin(String),
    /// A fragment glob pattern failed to compile.
    #[error("invalid fragment pattern: {0}")]
    Pattern(String),
    /// No bundle output path was configured or merged.
    #[error("no bundle output path configured (set bundle_output_path or build_path)")]
    MissingBuildPath,
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
