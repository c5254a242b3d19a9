//! Plugin enumeration.

use crate::error::RequireKitError;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Source of installed plugins and their root directories.
pub trait PluginRegistry: Send + Sync {
    /// Plugin ids in merge order; later plugins override earlier ones.
    fn plugins(&self) -> Vec<String>;

    /// Root directory of a plugin, if the id is known.
    fn root_dir(&self, plugin: &str) -> Option<PathBuf>;
}

/// Registry backed by an explicit, ordered plugin list.
#[derive(Debug, Clone, Default)]
pub struct StaticPluginRegistry {
    entries: Vec<(String, PathBuf)>,
}

impl StaticPluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin. Re-registering an id replaces its root in place.
    pub fn with_plugin(mut self, name: impl Into<String>, root: impl AsRef<Path>) -> Self {
        self.register(name, root);
        self
    }

    /// Append a plugin. Re-registering an id replaces its root in place.
    pub fn register(&mut self, name: impl Into<String>, root: impl AsRef<Path>) {
        let name = name.into();
        let root = root.as_ref().to_path_buf();
        match self.entries.iter().position(|(existing, _)| *existing == name) {
            Some(idx) => self.entries[idx].1 = root,
            None => self.entries.push((name, root)),
        }
    }

    /// Treat every sub-directory of `root` as a plugin, ordered by name.
    pub fn from_directory(root: impl AsRef<Path>) -> Result<Self, RequireKitError> {
        let root = root.as_ref();
        let mut dirs = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                dirs.push(entry.path());
            }
        }
        dirs.sort();

        let mut registry = Self::new();
        for dir in dirs {
            let Some(name) = dir.file_name().and_then(|name| name.to_str()) else {
                debug!("skipping non-utf8 plugin dir: {}", dir.display());
                continue;
            };
            let name = name.to_string();
            registry.register(name, &dir);
        }
        info!(
            "discovered plugins (root={}, count={})",
            root.display(),
            registry.entries.len()
        );
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PluginRegistry for StaticPluginRegistry {
    fn plugins(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    fn root_dir(&self, plugin: &str) -> Option<PathBuf> {
        self.entries
            .iter()
            .find(|(name, _)| name == plugin)
            .map(|(_, root)| root.clone())
    }
}
