//! Folding plugin fragments into one merged config.

use crate::error::RequireKitError;
use crate::fragments::FragmentLoader;
use crate::registry::PluginRegistry;
use log::{debug, info};
use parking_lot::Mutex;
use requirekit_config::ConfigTree;
use requirekit_config::merge::merge;
use std::sync::Arc;

/// Merge every plugin's fragments over `base`, in the given plugin order.
///
/// Plugins without fragments are skipped. The first fragment that fails to
/// load aborts the whole aggregation.
pub fn collect(
    base: ConfigTree,
    plugins: &[String],
    loader: &dyn FragmentLoader,
) -> Result<ConfigTree, RequireKitError> {
    info!("collecting loader config (plugins={})", plugins.len());
    let mut result = base;
    let mut merged_fragments = 0usize;
    for plugin in plugins {
        let fragments = loader.fragments_for(plugin)?;
        if fragments.is_empty() {
            debug!("plugin has no fragment (plugin={plugin})");
            continue;
        }
        for fragment in fragments {
            debug!(
                "merging fragment (plugin={}, path={})",
                fragment.plugin,
                fragment
                    .path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "<memory>".to_string())
            );
            result = merge(result, fragment.tree);
            merged_fragments += 1;
        }
    }
    info!("loader config collected (fragments={merged_fragments})");
    Ok(result)
}

/// Produces the merged config for the installed plugin set, once.
pub struct ConfigAggregator {
    base: ConfigTree,
    registry: Arc<dyn PluginRegistry>,
    loader: Arc<dyn FragmentLoader>,
    collected: Mutex<Option<ConfigTree>>,
}

impl ConfigAggregator {
    pub fn new(
        base: ConfigTree,
        registry: Arc<dyn PluginRegistry>,
        loader: Arc<dyn FragmentLoader>,
    ) -> Self {
        Self {
            base,
            registry,
            loader,
            collected: Mutex::new(None),
        }
    }

    /// Base config the aggregation starts from.
    pub fn base(&self) -> &ConfigTree {
        &self.base
    }

    /// Merged config across all registered plugins.
    ///
    /// Computed on first call and reused for the lifetime of the aggregator
    /// until [`ConfigAggregator::reset`]. A failed aggregation is not memoized.
    pub fn collect_configs(&self) -> Result<ConfigTree, RequireKitError> {
        let mut collected = self.collected.lock();
        if let Some(config) = collected.as_ref() {
            return Ok(config.clone());
        }
        let plugins = self.registry.plugins();
        let config = collect(self.base.clone(), &plugins, self.loader.as_ref())?;
        *collected = Some(config.clone());
        Ok(config)
    }

    /// Drop the memoized config so the next call re-reads every fragment.
    pub fn reset(&self) {
        *self.collected.lock() = None;
    }
}
