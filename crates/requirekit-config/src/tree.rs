//! Config tree type and the default base configuration.

use serde_json::{Map, Value, json};

/// Ordered nested mapping of string keys to values.
pub type ConfigTree = Map<String, Value>;

/// Key of the runtime subtree handed to the loader at page load.
pub const RUNTIME_SECTION: &str = "config";
/// Key of the build subtree handed to the optimizer.
pub const BUILD_SECTION: &str = "build";
/// Key of the path table inside both subtrees.
pub const PATHS_KEY: &str = "paths";
/// Key of the default bundle output path.
pub const BUILD_PATH_KEY: &str = "build_path";

/// Base configuration every aggregation starts from.
pub fn default_base_config() -> ConfigTree {
    let value = json!({
        "config": {
            "waitSeconds": 0,
            "enforceDefine": false,
            "scriptType": "text/javascript",
            "shim": {},
            "map": {},
            "paths": {}
        },
        "build_path": "js/app.min.js",
        "build": {
            "optimize": "uglify2",
            "preserveLicenseComments": true,
            "generateSourceMaps": true,
            "useSourceUrl": true,
            "paths": {}
        }
    });
    match value {
        Value::Object(map) => map,
        _ => ConfigTree::new(),
    }
}

/// Borrow a nested mapping by key, if the value is a mapping.
pub fn section<'a>(tree: &'a ConfigTree, key: &str) -> Option<&'a ConfigTree> {
    tree.get(key).and_then(Value::as_object)
}

/// Convert a value into a tree, rejecting non-mapping roots.
pub fn into_tree(value: Value) -> Option<ConfigTree> {
    match value {
        Value::Object(map) => Some(map),
        Value::Null => Some(ConfigTree::new()),
        _ => None,
    }
}
