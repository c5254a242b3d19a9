//! Fragment discovery and loading.
//!
//! A fragment is one plugin's partial loader config. Loaders resolve zero or
//! more fragment files relative to a plugin root and parse them in a stable
//! order.

use crate::error::RequireKitError;
use crate::registry::PluginRegistry;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use requirekit_config::{ConfigTree, load_fragment_file};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// One plugin's parsed config fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Plugin the fragment belongs to.
    pub plugin: String,
    /// File the fragment was read from, when file-backed.
    pub path: Option<PathBuf>,
    pub tree: ConfigTree,
}

/// Locates and parses the fragments shipped by a plugin.
pub trait FragmentLoader: Send + Sync {
    /// Fragments for a plugin, in merge order. Empty when it ships none.
    fn fragments_for(&self, plugin: &str) -> Result<Vec<Fragment>, RequireKitError>;
}

/// Loads a single fragment from a fixed path relative to each plugin root.
#[derive(Clone)]
pub struct ConventionalFragmentLoader {
    registry: Arc<dyn PluginRegistry>,
    relative_path: PathBuf,
}

impl ConventionalFragmentLoader {
    pub fn new(registry: Arc<dyn PluginRegistry>, relative_path: impl AsRef<Path>) -> Self {
        Self {
            registry,
            relative_path: relative_path.as_ref().to_path_buf(),
        }
    }
}

impl FragmentLoader for ConventionalFragmentLoader {
    fn fragments_for(&self, plugin: &str) -> Result<Vec<Fragment>, RequireKitError> {
        let root = plugin_root(self.registry.as_ref(), plugin)?;
        let path = root.join(&self.relative_path);
        if !path.is_file() {
            debug!(
                "no fragment for plugin (plugin={}, path={})",
                plugin,
                path.display()
            );
            return Ok(Vec::new());
        }
        let tree = load_fragment_file(&path, plugin)?;
        Ok(vec![Fragment {
            plugin: plugin.to_string(),
            path: Some(path),
            tree,
        }])
    }
}

/// Walks each plugin root and loads every file matching a set of globs.
#[derive(Clone)]
pub struct ScanFragmentLoader {
    registry: Arc<dyn PluginRegistry>,
    patterns: GlobSet,
}

impl ScanFragmentLoader {
    /// Compile the glob patterns, matched against paths relative to the root.
    pub fn new(
        registry: Arc<dyn PluginRegistry>,
        patterns: &[String],
    ) -> Result<Self, RequireKitError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|err| RequireKitError::Pattern(err.to_string()))?;
            builder.add(glob);
        }
        let patterns = builder
            .build()
            .map_err(|err| RequireKitError::Pattern(err.to_string()))?;
        Ok(Self { registry, patterns })
    }

    /// Matching files under `root` in path order. A missing root has none;
    /// any entry the walk cannot read fails the scan.
    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, RequireKitError> {
        if !root.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let matched = entry
                .path()
                .strip_prefix(root)
                .is_ok_and(|relative| self.patterns.is_match(relative));
            if matched {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

impl FragmentLoader for ScanFragmentLoader {
    fn fragments_for(&self, plugin: &str) -> Result<Vec<Fragment>, RequireKitError> {
        let root = plugin_root(self.registry.as_ref(), plugin)?;
        let files = self.discover(&root)?;
        debug!(
            "scanned plugin for fragments (plugin={}, matches={})",
            plugin,
            files.len()
        );
        files
            .into_iter()
            .map(|path| {
                let tree = load_fragment_file(&path, plugin)?;
                Ok(Fragment {
                    plugin: plugin.to_string(),
                    path: Some(path),
                    tree,
                })
            })
            .collect()
    }
}

fn plugin_root(registry: &dyn PluginRegistry, plugin: &str) -> Result<PathBuf, RequireKitError> {
    registry
        .root_dir(plugin)
        .ok_or_else(|| RequireKitError::UnknownPlugin(plugin.to_string()))
}
