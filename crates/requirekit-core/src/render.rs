//! Template rendering seam for the runtime script.

use serde_json::Value;
use thiserror::Error;

/// Errors returned by a renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown template: {0}")]
    UnknownTemplate(String),
    #[error("failed to render {template}: {message}")]
    Failed { template: String, message: String },
}

/// Turns render data into literal script text.
pub trait Renderer: Send + Sync {
    fn render(&self, template: &str, context: &Value) -> Result<String, RenderError>;
}
