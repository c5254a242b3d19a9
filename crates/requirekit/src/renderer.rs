//! Default runtime script renderer.

use requirekit_config::DEFAULT_TEMPLATE;
use requirekit_core::{RenderError, Renderer};
use serde_json::Value;

/// Renders the runtime section as a `require.config(...)` call.
#[derive(Debug, Clone)]
pub struct ScriptRenderer {
    template: String,
}

impl Default for ScriptRenderer {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl ScriptRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a different template id than the default.
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl Renderer for ScriptRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String, RenderError> {
        if template != self.template {
            return Err(RenderError::UnknownTemplate(template.to_string()));
        }
        let config = context.get("config").cloned().unwrap_or(Value::Null);
        let body = serde_json::to_string_pretty(&config).map_err(|err| RenderError::Failed {
            template: template.to_string(),
            message: err.to_string(),
        })?;
        Ok(format!("require.config({body});\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn renders_require_config_call() {
        let renderer = ScriptRenderer::new();
        let script = renderer
            .render(
                DEFAULT_TEMPLATE,
                &json!({"config": {"paths": {"app": "app/main"}}}),
            )
            .expect("script");
        assert_eq!(
            script,
            "require.config({\n  \"paths\": {\n    \"app\": \"app/main\"\n  }\n});\n"
        );
    }

    #[test]
    fn rejects_unknown_template() {
        let err = ScriptRenderer::new()
            .render("other.twig", &json!({}))
            .unwrap_err();
        assert!(matches!(err, RenderError::UnknownTemplate(name) if name == "other.twig"));
    }
}
