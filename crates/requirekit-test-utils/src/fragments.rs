use parking_lot::Mutex;
use requirekit_config::ConfigTree;
use requirekit_core::{Fragment, FragmentLoader, RequireKitError};
use std::collections::HashMap;

/// In-memory fragment loader that records which plugins were asked for.
#[derive(Debug, Default)]
pub struct StubFragmentLoader {
    fragments: HashMap<String, Vec<ConfigTree>>,
    failing: Option<String>,
    requests: Mutex<Vec<String>>,
}

impl StubFragmentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fragment(mut self, plugin: impl Into<String>, tree: ConfigTree) -> Self {
        self.fragments.entry(plugin.into()).or_default().push(tree);
        self
    }

    /// Make loading `plugin` fail like an unparsable fragment file.
    pub fn with_failure(mut self, plugin: impl Into<String>) -> Self {
        self.failing = Some(plugin.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl FragmentLoader for StubFragmentLoader {
    fn fragments_for(&self, plugin: &str) -> Result<Vec<Fragment>, RequireKitError> {
        self.requests.lock().push(plugin.to_string());
        if self.failing.as_deref() == Some(plugin) {
            return Err(RequireKitError::Config(
                requirekit_config::ConfigError::Invalid(format!("broken fragment in {plugin}")),
            ));
        }
        Ok(self
            .fragments
            .get(plugin)
            .map(|trees| {
                trees
                    .iter()
                    .map(|tree| Fragment {
                        plugin: plugin.to_string(),
                        path: None,
                        tree: tree.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
