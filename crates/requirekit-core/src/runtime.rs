//! Runtime loader config derived from the merged config.

use requirekit_config::{ConfigTree, PATHS_KEY, RUNTIME_SECTION, section};
use serde::Serialize;
use serde_json::{Value, json};

/// Public assets prefix stripped from runtime module paths.
pub const PUBLIC_PREFIX: &str = "bundles/";
/// Script extension stripped from runtime module paths.
pub const SCRIPT_EXTENSION: &str = ".js";

/// Runtime subtree with its path table normalized for the loader.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuntimeArtifact {
    config: ConfigTree,
}

impl RuntimeArtifact {
    /// Full runtime subtree.
    pub fn config(&self) -> &ConfigTree {
        &self.config
    }

    /// Normalized module-id to path table, if the subtree defines one.
    pub fn paths(&self) -> Option<&ConfigTree> {
        section(&self.config, PATHS_KEY)
    }

    /// Data handed to the renderer.
    pub fn render_context(&self) -> Value {
        json!({ "config": self.config })
    }

    pub fn into_config(self) -> ConfigTree {
        self.config
    }
}

/// Derives the runtime artifact.
pub struct RuntimeConfigBuilder;

impl RuntimeConfigBuilder {
    /// Copy the runtime subtree and normalize every string path entry.
    pub fn build(merged: &ConfigTree) -> RuntimeArtifact {
        let mut config = section(merged, RUNTIME_SECTION).cloned().unwrap_or_default();
        if let Some(Value::Object(paths)) = config.get_mut(PATHS_KEY) {
            for entry in paths.values_mut() {
                if let Value::String(path) = entry {
                    *path = normalize_module_path(path);
                }
            }
        }
        RuntimeArtifact { config }
    }
}

/// Strip the public prefix and the script extension, each independently.
pub fn normalize_module_path(path: &str) -> String {
    let path = path.strip_prefix(PUBLIC_PREFIX).unwrap_or(path);
    let path = path.strip_suffix(SCRIPT_EXTENSION).unwrap_or(path);
    path.to_string()
}
