//! Test helpers shared across requirekit crates.

pub mod cache;
pub mod fragments;
pub mod render;

pub use cache::{CacheCounts, CountingCache};
pub use fragments::StubFragmentLoader;
pub use render::RecordingRenderer;

use requirekit_config::ConfigTree;
use serde_json::Value;

/// Unwrap a `json!` object literal into a config tree.
pub fn tree(value: Value) -> ConfigTree {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
