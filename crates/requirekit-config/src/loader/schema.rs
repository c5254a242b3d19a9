//! Schema validation helpers for settings and fragment files.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a settings document against the schema.
pub(super) fn validate_settings_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    let allowed = [
        "$schema",
        "web_root",
        "bundle_output_path",
        "fragment_path",
        "fragment_patterns",
        "template",
        "cache",
        "base",
    ];
    ensure_allowed_keys(map, &allowed, layer, "")?;

    for key in ["$schema", "web_root", "fragment_path", "template"] {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, key)?;
        }
    }
    if let Some(value) = map.get("bundle_output_path") {
        if !value.is_null() {
            expect_string(value, layer, "bundle_output_path")?;
        }
    }
    if let Some(value) = map.get("fragment_patterns") {
        validate_string_array(value, layer, "fragment_patterns")?;
    }
    if let Some(value) = map.get("cache") {
        validate_cache(value, layer, "cache")?;
    }
    if let Some(value) = map.get("base") {
        validate_tree(value, layer, "base")?;
    }

    Ok(())
}

/// Validate a parsed fragment: the root must be a mapping or empty.
///
/// Nested shapes are left to the merge, where a type conflict resolves to
/// the later value.
pub(super) fn validate_fragment_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    if value.is_null() {
        return Ok(());
    }
    expect_object(value, layer, "").map(|_| ())
}

/// Validate the loader sections of the settings' base tree.
fn validate_tree(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    for section in ["config", "build"] {
        if let Some(value) = map.get(section) {
            let section_path = join_path(path, section);
            let section_map = expect_object(value, layer, &section_path)?;
            if let Some(paths) = section_map.get("paths") {
                validate_path_table(paths, layer, &join_path(&section_path, "paths"))?;
            }
        }
    }
    if let Some(value) = map.get("build_path") {
        expect_string(value, layer, &join_path(path, "build_path"))?;
    }
    Ok(())
}

/// Validate the "cache" block.
fn validate_cache(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["layer", "dir"], layer, path)?;
    if let Some(value) = map.get("layer") {
        let layer_path = join_path(path, "layer");
        let Some(mode) = value.as_str() else {
            return Err(invalid_field(layer, &layer_path, "expected string"));
        };
        if !matches!(mode, "none" | "merged" | "rendered" | "both") {
            return Err(invalid_field(
                layer,
                &layer_path,
                "expected one of none, merged, rendered, both",
            ));
        }
    }
    if let Some(value) = map.get("dir") {
        if !value.is_null() {
            expect_string(value, layer, &join_path(path, "dir"))?;
        }
    }
    Ok(())
}

/// A path table maps module ids to a path or a list of fallback paths.
fn validate_path_table(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    for (module, entry) in map {
        let entry_path = join_path(path, module);
        match entry {
            Value::String(_) => {}
            Value::Array(_) => validate_string_array(entry, layer, &entry_path)?,
            _ => {
                return Err(invalid_field(
                    layer,
                    &entry_path,
                    "expected string or array of strings",
                ));
            }
        }
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Validate that a value is an array of strings.
fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let arr = match value {
        Value::Array(arr) => arr,
        _ => return Err(invalid_field(layer, path, "expected array")),
    };
    for (idx, entry) in arr.iter().enumerate() {
        if entry.as_str().is_none() {
            return Err(invalid_field(
                layer,
                &format!("{path}[{idx}]"),
                "expected string",
            ));
        }
    }
    Ok(())
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
