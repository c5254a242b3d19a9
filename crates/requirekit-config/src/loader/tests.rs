//! Tests for settings and fragment loading.

use super::*;
use crate::{CacheLayer, PATHS_KEY, RUNTIME_SECTION, section};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write contents to a path, creating parent directories if needed.
fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Verify that minimal settings parse with defaults.
#[test]
fn parse_minimal_settings() {
    let settings = KitSettings::load_from_str("{}").expect("settings");
    assert_eq!(settings.fragment_path, crate::DEFAULT_FRAGMENT_PATH);
    assert_eq!(settings.template, crate::DEFAULT_TEMPLATE);
    assert_eq!(settings.cache.layer, CacheLayer::Both);
    assert!(settings.bundle_output_path.is_none());
}

#[test]
fn parse_full_settings() {
    let json5 = r#"{
        web_root: "public",
        bundle_output_path: "js/site.min.js",
        fragment_patterns: ["**/requirejs.yml"],
        cache: { layer: "merged", dir: "/tmp/requirekit" },
        base: { config: { waitSeconds: 30 } },
    }"#;
    let settings = KitSettings::load_from_str(json5).expect("settings");
    assert_eq!(settings.web_root, "public");
    assert_eq!(settings.bundle_output_path.as_deref(), Some("js/site.min.js"));
    assert_eq!(settings.fragment_patterns, vec!["**/requirejs.yml".to_string()]);
    assert_eq!(settings.cache.layer, CacheLayer::Merged);
    assert_eq!(settings.cache.dir.as_deref(), Some("/tmp/requirekit"));

    let base = settings.base_config();
    let runtime = section(&base, RUNTIME_SECTION).expect("runtime section");
    assert_eq!(runtime.get("waitSeconds"), Some(&json!(30)));
    assert_eq!(runtime.get(PATHS_KEY), Some(&json!({})));
}

/// Reject unexpected top-level settings keys.
#[test]
fn rejects_unknown_top_level_key() {
    let err = KitSettings::load_from_str("{ unexpected: true }").unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("unknown key"));
}

#[test]
fn rejects_invalid_cache_layer() {
    let err = KitSettings::load_from_str(r#"{ cache: { layer: "sometimes" } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cache.layer"));
}

#[test]
fn rejects_empty_template() {
    let err = KitSettings::load_from_str(r#"{ template: "  " }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn settings_load_from_path() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join(DEFAULT_SETTINGS_FILE);
    write_file(&path, r#"{ web_root: "web" }"#);
    let settings = KitSettings::load_from_path(&path).expect("settings");
    assert_eq!(settings.web_root, "web");
}

#[test]
fn yaml_fragment_keeps_key_order() {
    let yaml = "config:\n  paths:\n    zepto: bundles/zepto.js\n    app: bundles/app.js\n";
    let tree = parse_fragment(yaml, FragmentFormat::Yaml, "acme").expect("fragment");
    let paths = section(section(&tree, "config").expect("config"), "paths").expect("paths");
    let keys: Vec<_> = paths.keys().cloned().collect();
    assert_eq!(keys, vec!["zepto", "app"]);
}

#[test]
fn yaml_numeric_keys_are_stringified() {
    let yaml = "config:\n  map:\n    1: one\n";
    let tree = parse_fragment(yaml, FragmentFormat::Yaml, "acme").expect("fragment");
    assert_eq!(
        serde_json::Value::Object(tree),
        json!({"config": {"map": {"1": "one"}}})
    );
}

#[test]
fn empty_yaml_fragment_is_empty_tree() {
    let tree = parse_fragment("", FragmentFormat::Yaml, "acme").expect("fragment");
    assert!(tree.is_empty());
}

#[test]
fn malformed_yaml_fails_to_parse() {
    let err = parse_fragment("config: [unclosed", FragmentFormat::Yaml, "acme").unwrap_err();
    assert!(matches!(err, ConfigError::YamlFailed(_)));
}

#[test]
fn non_mapping_fragment_is_rejected() {
    let err = parse_fragment("- a\n- b\n", FragmentFormat::Yaml, "acme").unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("acme:root"));
}

/// Shape conflicts inside a fragment are left for the merge to resolve.
#[test]
fn fragment_accepts_any_nested_shape() {
    let tree = parse_fragment("config:\n  paths:\n", FragmentFormat::Yaml, "acme")
        .expect("null paths");
    assert_eq!(
        serde_json::Value::Object(tree),
        json!({"config": {"paths": null}})
    );

    let tree = parse_fragment("config: disabled\n", FragmentFormat::Yaml, "acme")
        .expect("scalar section");
    assert_eq!(serde_json::Value::Object(tree), json!({"config": "disabled"}));

    let tree = parse_fragment(
        "config:\n  paths:\n    jquery: 3\n",
        FragmentFormat::Yaml,
        "acme",
    )
    .expect("numeric path entry");
    assert_eq!(
        serde_json::Value::Object(tree),
        json!({"config": {"paths": {"jquery": 3}}})
    );
}

#[test]
fn settings_base_path_table_must_hold_strings() {
    let err = KitSettings::load_from_str("{ base: { config: { paths: { jquery: 3 } } } }")
        .unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("base.config.paths.jquery"));
}

#[test]
fn fragment_path_table_accepts_fallback_lists() {
    let yaml = "config:\n  paths:\n    jquery: [cdn/jquery, bundles/jquery.js]\n";
    let tree = parse_fragment(yaml, FragmentFormat::Yaml, "acme").expect("fragment");
    assert_eq!(
        serde_json::Value::Object(tree),
        json!({"config": {"paths": {"jquery": ["cdn/jquery", "bundles/jquery.js"]}}})
    );
}

#[test]
fn json5_fragment_from_file() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("requirejs.json5");
    write_file(&path, "{ build: { paths: { text: 'lib/text' } } }");
    let tree = load_fragment_file(&path, "acme").expect("fragment");
    assert_eq!(
        serde_json::Value::Object(tree),
        json!({"build": {"paths": {"text": "lib/text"}}})
    );
}

#[test]
fn unsupported_extension_is_rejected() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("requirejs.ini");
    write_file(&path, "paths=1");
    let err = load_fragment_file(&path, "acme").unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}
