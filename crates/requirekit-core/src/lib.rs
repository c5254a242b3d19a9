//! Aggregation core for plugin loader config.
//!
//! This crate discovers each plugin's config fragment, folds them into one
//! merged config, and derives the runtime script data and the optimizer
//! build config from it.

pub mod aggregator;
pub mod build;
pub mod cache;
pub mod error;
pub mod fragments;
pub mod provider;
pub mod registry;
pub mod render;
pub mod runtime;

/// Aggregation entry points.
pub use aggregator::{ConfigAggregator, collect};
/// Build config derivation.
pub use build::{BuildArtifact, BuildConfigBuilder};
/// Cache capability and gate.
pub use cache::{CacheGate, CacheStore, FileCache, MemoryCache};
pub use error::RequireKitError;
/// Fragment loading strategies.
pub use fragments::{ConventionalFragmentLoader, Fragment, FragmentLoader, ScanFragmentLoader};
/// Public provider facade.
pub use provider::{
    ConfigProvider, MAIN_CONFIG_CACHE_KEY, MERGED_CONFIG_CACHE_KEY, ProviderOptions,
};
pub use registry::{PluginRegistry, StaticPluginRegistry};
pub use render::{RenderError, Renderer};
/// Runtime config derivation.
pub use runtime::{RuntimeArtifact, RuntimeConfigBuilder};
