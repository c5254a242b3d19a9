//! Settings schema for requirekit.

use crate::ConfigTree;
use serde::{Deserialize, Serialize};

/// Conventional fragment location relative to a plugin root.
pub const DEFAULT_FRAGMENT_PATH: &str = "Resources/config/requirejs.yml";
/// Template identifier passed to the renderer for the runtime script.
pub const DEFAULT_TEMPLATE: &str = "require_config.js";

/// Root settings for the aggregator and its derived artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitSettings {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    /// Prefix joined onto every file path in the build config.
    #[serde(default)]
    pub web_root: String,
    /// Overrides the merged `build_path` entry when set.
    #[serde(default)]
    pub bundle_output_path: Option<String>,
    #[serde(default = "default_fragment_path")]
    pub fragment_path: String,
    /// Glob patterns for multi-file fragment discovery; empty keeps the
    /// single conventional path.
    #[serde(default)]
    pub fragment_patterns: Vec<String>,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default)]
    pub cache: CacheSettings,
    /// Tree merged over the built-in base config before any plugin.
    #[serde(default)]
    pub base: ConfigTree,
}

impl Default for KitSettings {
    fn default() -> Self {
        Self {
            schema: None,
            web_root: String::new(),
            bundle_output_path: None,
            fragment_path: default_fragment_path(),
            fragment_patterns: Vec::new(),
            template: default_template(),
            cache: CacheSettings::default(),
            base: ConfigTree::new(),
        }
    }
}

impl KitSettings {
    /// Start building settings programmatically with defaults applied.
    pub fn builder() -> KitSettingsBuilder {
        KitSettingsBuilder::new()
    }
}

/// Builder for assembling `KitSettings` in code.
#[derive(Debug, Default, Clone)]
pub struct KitSettingsBuilder {
    settings: KitSettings,
}

impl KitSettingsBuilder {
    pub fn new() -> Self {
        Self {
            settings: KitSettings::default(),
        }
    }

    pub fn web_root(mut self, web_root: impl Into<String>) -> Self {
        self.settings.web_root = web_root.into();
        self
    }

    pub fn bundle_output_path(mut self, path: impl Into<String>) -> Self {
        self.settings.bundle_output_path = Some(path.into());
        self
    }

    pub fn fragment_path(mut self, path: impl Into<String>) -> Self {
        self.settings.fragment_path = path.into();
        self
    }

    pub fn fragment_patterns(mut self, patterns: Vec<String>) -> Self {
        self.settings.fragment_patterns = patterns;
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.settings.template = template.into();
        self
    }

    pub fn cache(mut self, cache: CacheSettings) -> Self {
        self.settings.cache = cache;
        self
    }

    pub fn base(mut self, base: ConfigTree) -> Self {
        self.settings.base = base;
        self
    }

    /// Finalize and return the built settings.
    pub fn build(self) -> KitSettings {
        self.settings
    }
}

fn default_fragment_path() -> String {
    DEFAULT_FRAGMENT_PATH.to_string()
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

/// Which derived values go through the cache store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CacheLayer {
    /// Always recompute.
    None,
    /// Cache the merged config tree.
    Merged,
    /// Cache the rendered runtime script.
    Rendered,
    /// Cache both.
    #[default]
    Both,
}

impl CacheLayer {
    pub fn caches_merged(self) -> bool {
        matches!(self, Self::Merged | Self::Both)
    }

    pub fn caches_rendered(self) -> bool {
        matches!(self, Self::Rendered | Self::Both)
    }
}

/// Cache store selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheSettings {
    #[serde(default)]
    pub layer: CacheLayer,
    /// Directory for a file-backed store; memory-backed when unset.
    #[serde(default)]
    pub dir: Option<String>,
}
