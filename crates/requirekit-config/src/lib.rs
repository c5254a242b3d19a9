//! Loader config trees, merging, and settings.
//!
//! This crate owns the config tree type, the deep-merge policy used to fold
//! plugin fragments together, fragment parsing, and the settings schema.

mod error;
mod loader;
pub mod merge;
mod model;
mod tree;

/// Public error type returned by settings and fragment loading.
pub use error::ConfigError;
/// Fragment parsing entry points.
pub use loader::{DEFAULT_SETTINGS_FILE, FragmentFormat, load_fragment_file, parse_fragment};
/// Settings schema models.
pub use model::*;
/// Config tree type and section helpers.
pub use tree::{
    BUILD_PATH_KEY, BUILD_SECTION, ConfigTree, PATHS_KEY, RUNTIME_SECTION, default_base_config,
    into_tree, section,
};
