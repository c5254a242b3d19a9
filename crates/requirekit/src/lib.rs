//! Public SDK surface for requirekit.
//!
//! This crate re-exports the config and core crates and provides the default
//! script renderer plus a small logging helper.

/// Re-export for convenience.
pub use requirekit_config as config;
/// Re-export for convenience.
pub use requirekit_core as core;

mod renderer;

pub use renderer::ScriptRenderer;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
