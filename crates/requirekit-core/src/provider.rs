//! Public entry point: merged config, runtime script, and build config.

use crate::aggregator::ConfigAggregator;
use crate::build::{BuildArtifact, BuildConfigBuilder};
use crate::cache::{CacheGate, CacheStore, FileCache, MemoryCache};
use crate::error::RequireKitError;
use crate::fragments::{ConventionalFragmentLoader, FragmentLoader, ScanFragmentLoader};
use crate::registry::PluginRegistry;
use crate::render::Renderer;
use crate::runtime::{RuntimeArtifact, RuntimeConfigBuilder};
use log::{debug, info};
use requirekit_config::{BUILD_PATH_KEY, CacheLayer, ConfigTree, DEFAULT_TEMPLATE, KitSettings};
use std::sync::Arc;

/// Cache key for the merged config tree.
pub const MERGED_CONFIG_CACHE_KEY: &str = "requirejs_merged_config";
/// Cache key for the rendered runtime script.
pub const MAIN_CONFIG_CACHE_KEY: &str = "requirejs_config";

/// Options controlling derivation and caching.
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// Prefix joined onto build config file paths.
    pub web_root: String,
    /// Bundle output path; falls back to the merged `build_path`.
    pub bundle_output_path: Option<String>,
    /// Template id handed to the renderer.
    pub template: String,
    /// Which values go through the cache store.
    pub cache_layer: CacheLayer,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            web_root: String::new(),
            bundle_output_path: None,
            template: DEFAULT_TEMPLATE.to_string(),
            cache_layer: CacheLayer::Both,
        }
    }
}

impl From<&KitSettings> for ProviderOptions {
    fn from(settings: &KitSettings) -> Self {
        Self {
            web_root: settings.web_root.clone(),
            bundle_output_path: settings.bundle_output_path.clone(),
            template: settings.template.clone(),
            cache_layer: settings.cache.layer,
        }
    }
}

/// Serves the runtime script and build config for a plugin set.
pub struct ConfigProvider {
    aggregator: ConfigAggregator,
    renderer: Arc<dyn Renderer>,
    cache: CacheGate,
    options: ProviderOptions,
}

impl ConfigProvider {
    /// Create a provider without a cache store.
    pub fn new(
        aggregator: ConfigAggregator,
        renderer: Arc<dyn Renderer>,
        options: ProviderOptions,
    ) -> Self {
        Self {
            aggregator,
            renderer,
            cache: CacheGate::disabled(),
            options,
        }
    }

    /// Attach a cache store.
    pub fn with_cache(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache = CacheGate::new(Some(store));
        self
    }

    /// Wire loader, cache store, and options from settings.
    pub fn from_settings(
        settings: &KitSettings,
        registry: Arc<dyn PluginRegistry>,
        renderer: Arc<dyn Renderer>,
    ) -> Result<Self, RequireKitError> {
        let loader: Arc<dyn FragmentLoader> = if settings.fragment_patterns.is_empty() {
            Arc::new(ConventionalFragmentLoader::new(
                registry.clone(),
                &settings.fragment_path,
            ))
        } else {
            Arc::new(ScanFragmentLoader::new(
                registry.clone(),
                &settings.fragment_patterns,
            )?)
        };
        let aggregator = ConfigAggregator::new(settings.base_config(), registry, loader);
        let provider = Self::new(aggregator, renderer, ProviderOptions::from(settings));

        if settings.cache.layer == CacheLayer::None {
            info!("config provider ready (cache=none)");
            return Ok(provider);
        }
        let store: Arc<dyn CacheStore> = match settings.cache.dir.as_deref() {
            Some(dir) => Arc::new(FileCache::new(dir)?),
            None => Arc::new(MemoryCache::new()),
        };
        info!(
            "config provider ready (cache={:?}, dir={})",
            settings.cache.layer,
            settings.cache.dir.as_deref().unwrap_or("<memory>")
        );
        Ok(provider.with_cache(store))
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    /// Merged config, through the merged-config cache layer when enabled.
    pub fn collect_configs(&self) -> Result<ConfigTree, RequireKitError> {
        if self.options.cache_layer.caches_merged() {
            self.cache.get_or_compute(MERGED_CONFIG_CACHE_KEY, || {
                self.aggregator.collect_configs()
            })
        } else {
            self.aggregator.collect_configs()
        }
    }

    /// Runtime subtree with normalized module paths.
    pub fn runtime_config(&self) -> Result<RuntimeArtifact, RequireKitError> {
        let merged = self.collect_configs()?;
        Ok(RuntimeConfigBuilder::build(&merged))
    }

    /// Rendered runtime script, served from cache when available.
    pub fn get_main_config(&self) -> Result<String, RequireKitError> {
        if self.options.cache_layer.caches_rendered() {
            self.cache
                .get_or_compute(MAIN_CONFIG_CACHE_KEY, || self.generate_main_config())
        } else {
            self.generate_main_config()
        }
    }

    /// Render the runtime script from the (possibly cached) merged config.
    pub fn generate_main_config(&self) -> Result<String, RequireKitError> {
        let artifact = self.runtime_config()?;
        debug!(
            "rendering runtime config (template={}, paths={})",
            self.options.template,
            artifact.paths().map(|paths| paths.len()).unwrap_or(0)
        );
        let script = self
            .renderer
            .render(&self.options.template, &artifact.render_context())?;
        Ok(script)
    }

    /// Build config for a runtime config file at `runtime_config_file_path`.
    pub fn generate_build_config(
        &self,
        runtime_config_file_path: &str,
    ) -> Result<BuildArtifact, RequireKitError> {
        let merged = self.collect_configs()?;
        let bundle_output_path = match self.options.bundle_output_path.as_deref() {
            Some(path) => path.to_string(),
            None => merged
                .get(BUILD_PATH_KEY)
                .and_then(|value| value.as_str())
                .map(str::to_string)
                .ok_or(RequireKitError::MissingBuildPath)?,
        };
        info!(
            "generating build config (runtime_config={}, out={})",
            runtime_config_file_path, bundle_output_path
        );
        Ok(BuildConfigBuilder::build(
            &merged,
            runtime_config_file_path,
            &bundle_output_path,
            &self.options.web_root,
        ))
    }

    /// Drop both cached values and the aggregator's memo.
    pub fn clear_cache(&self) {
        self.cache.invalidate(MERGED_CONFIG_CACHE_KEY);
        self.cache.invalidate(MAIN_CONFIG_CACHE_KEY);
        self.aggregator.reset();
        info!("cleared loader config cache");
    }
}
