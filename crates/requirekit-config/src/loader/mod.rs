//! Settings and fragment file loading.
//!
//! Settings are read from JSON5. Fragments are read from YAML or JSON5,
//! checked against the loader schema, and returned as ordered config trees.

mod fragment_io;
mod schema;

#[cfg(test)]
mod tests;

use crate::merge::merge;
use crate::tree::{default_base_config, into_tree};
use crate::{ConfigError, ConfigTree, KitSettings};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Default settings filename looked up by the CLI.
pub const DEFAULT_SETTINGS_FILE: &str = "requirekit.json5";

/// Serialization format of a fragment file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentFormat {
    Yaml,
    Json5,
}

impl FragmentFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "yml" | "yaml" => Ok(Self::Yaml),
            "json" | "json5" => Ok(Self::Json5),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl KitSettings {
    /// Load settings from a JSON5 file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading settings from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load settings from JSON5 contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading settings from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        schema::validate_settings_schema(&value, "settings")?;
        let settings: KitSettings = serde_json::from_value(value)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fragment_path.trim().is_empty() && self.fragment_patterns.is_empty() {
            return Err(ConfigError::Invalid(
                "fragment_path or fragment_patterns is required".to_string(),
            ));
        }
        if self.template.trim().is_empty() {
            return Err(ConfigError::Invalid("template must not be empty".to_string()));
        }
        Ok(())
    }

    /// Built-in base config with the `base` override merged on top.
    pub fn base_config(&self) -> ConfigTree {
        merge(default_base_config(), self.base.clone())
    }
}

/// Read and parse a fragment file, labelling errors with `label`.
pub fn load_fragment_file(path: &Path, label: &str) -> Result<ConfigTree, ConfigError> {
    debug!("loading fragment (label={}, path={})", label, path.display());
    let format = FragmentFormat::from_path(path)?;
    let contents = fs::read_to_string(path)?;
    parse_fragment(&contents, format, &format!("{label}({})", path.display()))
}

/// Parse fragment contents in the given format.
pub fn parse_fragment(
    contents: &str,
    format: FragmentFormat,
    label: &str,
) -> Result<ConfigTree, ConfigError> {
    let value = match format {
        FragmentFormat::Yaml => fragment_io::parse_yaml(contents)?,
        FragmentFormat::Json5 => json5::from_str::<Value>(contents)?,
    };
    schema::validate_fragment_schema(&value, label)?;
    into_tree(value).ok_or_else(|| ConfigError::InvalidField {
        path: format!("{label}:root"),
        message: "expected object".to_string(),
    })
}
