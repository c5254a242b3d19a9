//! Optimizer build config derived from the merged config.

use crate::runtime::SCRIPT_EXTENSION;
use requirekit_config::{BUILD_SECTION, ConfigTree, PATHS_KEY, RUNTIME_SECTION, section};
use serde::Serialize;
use serde_json::Value;

/// Directory (under the root prefix) the optimizer resolves modules from.
pub const BUNDLES_DIR: &str = "bundles";
/// Built-in module id for the generated runtime config.
pub const REQUIRE_CONFIG_MODULE: &str = "require-config";
/// Built-in module id for the loader library.
pub const REQUIRE_LIB_MODULE: &str = "require-lib";
/// Location of the loader library, relative to the bundles dir.
pub const REQUIRE_LIB_PATH: &str = "npmassets/requirejs/require";

/// Build directive set handed to the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BuildArtifact {
    directives: ConfigTree,
}

impl BuildArtifact {
    pub fn directives(&self) -> &ConfigTree {
        &self.directives
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.directives.get(key)
    }

    /// Final path table, built-ins included.
    pub fn paths(&self) -> Option<&ConfigTree> {
        section(&self.directives, PATHS_KEY)
    }

    /// Module ids the optimizer bundles into the output file.
    pub fn include(&self) -> Vec<&str> {
        self.directives
            .get("include")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn into_directives(self) -> ConfigTree {
        self.directives
    }
}

/// Derives the build artifact.
pub struct BuildConfigBuilder;

impl BuildConfigBuilder {
    /// Assemble the build directives for one runtime config file and bundle.
    ///
    /// All file paths are joined onto `root_prefix`. The built-in path
    /// entries win over same-named entries from the build subtree, and
    /// `include` lists the built-ins followed by every runtime module id.
    pub fn build(
        merged: &ConfigTree,
        runtime_config_file_path: &str,
        bundle_output_path: &str,
        root_prefix: &str,
    ) -> BuildArtifact {
        let mut directives = section(merged, BUILD_SECTION).cloned().unwrap_or_default();

        directives.insert(
            "baseUrl".to_string(),
            Value::String(join_root(root_prefix, BUNDLES_DIR)),
        );
        directives.insert(
            "out".to_string(),
            Value::String(join_root(root_prefix, bundle_output_path)),
        );
        directives.insert(
            "mainConfigFile".to_string(),
            Value::String(join_root(root_prefix, runtime_config_file_path)),
        );

        let builtins = builtin_paths(runtime_config_file_path, root_prefix);

        let mut paths = section(&directives, PATHS_KEY).cloned().unwrap_or_default();
        for (module, path) in &builtins {
            paths.insert(module.clone(), path.clone());
        }
        directives.insert(PATHS_KEY.to_string(), Value::Object(paths));

        let runtime_paths =
            section(merged, RUNTIME_SECTION).and_then(|runtime| section(runtime, PATHS_KEY));
        let include = match runtime_paths {
            Some(runtime_paths) if !runtime_paths.is_empty() => builtins
                .keys()
                .chain(runtime_paths.keys())
                .cloned()
                .map(Value::String)
                .collect(),
            _ => Vec::new(),
        };
        directives.insert("include".to_string(), Value::Array(include));

        BuildArtifact { directives }
    }
}

fn builtin_paths(runtime_config_file_path: &str, root_prefix: &str) -> ConfigTree {
    let module_path = runtime_config_file_path
        .strip_suffix(SCRIPT_EXTENSION)
        .unwrap_or(runtime_config_file_path);
    let mut paths = ConfigTree::new();
    paths.insert(
        REQUIRE_CONFIG_MODULE.to_string(),
        Value::String(join_root(root_prefix, module_path)),
    );
    paths.insert(
        REQUIRE_LIB_MODULE.to_string(),
        Value::String(REQUIRE_LIB_PATH.to_string()),
    );
    paths
}

/// Join a segment onto the root prefix with exactly one `/` between them.
pub fn join_root(root_prefix: &str, segment: &str) -> String {
    let root = root_prefix.trim_end_matches('/');
    let segment = segment.trim_start_matches('/');
    if root.is_empty() {
        if root_prefix.is_empty() {
            segment.to_string()
        } else {
            format!("/{segment}")
        }
    } else {
        format!("{root}/{segment}")
    }
}
