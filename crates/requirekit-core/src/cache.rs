//! Key/value cache capability and the memoizing gate in front of it.

use crate::error::RequireKitError;
use log::{debug, warn};
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Pluggable cache store.
///
/// Stores are expected to fail open: an unreachable backend reports a miss
/// and drops writes rather than erroring.
pub trait CacheStore: Send + Sync {
    fn contains(&self, key: &str) -> bool;

    fn fetch(&self, key: &str) -> Option<Value>;

    fn save(&self, key: &str, value: Value);

    fn delete(&self, key: &str);
}

/// Process-local cache store.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl CacheStore for MemoryCache {
    fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    fn fetch(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    fn save(&self, key: &str, value: Value) {
        self.entries.write().insert(key.to_string(), value);
    }

    fn delete(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// Cache store keeping one JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Create the store, creating `root` if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, RequireKitError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!("initialized file cache (root={})", root.display());
        Ok(Self { root })
    }

    /// Remove every cached entry.
    pub fn clear(&self) -> Result<(), RequireKitError> {
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    /// File for `key`. Bytes outside `[A-Za-z0-9_-]` are written as `%XX`,
    /// so distinct keys never share a file.
    fn entry_path(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("%{byte:02X}"));
            }
        }
        self.root.join(format!("{name}.json"))
    }
}

impl CacheStore for FileCache {
    fn contains(&self, key: &str) -> bool {
        self.entry_path(key).is_file()
    }

    fn fetch(&self, key: &str) -> Option<Value> {
        let path = self.entry_path(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                debug!("cache read missed (path={}): {err}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("discarding corrupt cache entry (path={}): {err}", path.display());
                None
            }
        }
    }

    fn save(&self, key: &str, value: Value) {
        let path = self.entry_path(key);
        let tmp_path = path.with_extension("json.tmp");
        let result = serde_json::to_vec(&value)
            .map_err(std::io::Error::other)
            .and_then(|bytes| fs::write(&tmp_path, bytes))
            .and_then(|_| fs::rename(&tmp_path, &path));
        if let Err(err) = result {
            warn!("failed to write cache entry (path={}): {err}", path.display());
        }
    }

    fn delete(&self, key: &str) {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!("failed to delete cache entry (path={}): {err}", path.display()),
        }
    }
}

/// Memoizes derived values under fixed keys in an optional store.
#[derive(Clone, Default)]
pub struct CacheGate {
    store: Option<Arc<dyn CacheStore>>,
}

impl CacheGate {
    pub fn new(store: Option<Arc<dyn CacheStore>>) -> Self {
        Self { store }
    }

    /// Gate that never caches.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Return the value cached under `key`, or compute, save, and return it.
    ///
    /// On a hit `compute` is not called. A stored value that no longer
    /// decodes as `T` counts as a miss.
    pub fn get_or_compute<T, E, F>(&self, key: &str, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        let Some(store) = self.store.as_ref() else {
            return compute();
        };

        if store.contains(key) {
            if let Some(stored) = store.fetch(key) {
                match serde_json::from_value(stored) {
                    Ok(value) => {
                        debug!("cache hit (key={key})");
                        return Ok(value);
                    }
                    Err(err) => warn!("ignoring undecodable cache entry (key={key}): {err}"),
                }
            }
        }

        debug!("cache miss (key={key})");
        let value = compute()?;
        match serde_json::to_value(&value) {
            Ok(encoded) => store.save(key, encoded),
            Err(err) => warn!("skipping cache save (key={key}): {err}"),
        }
        Ok(value)
    }

    /// Drop a cached entry.
    pub fn invalidate(&self, key: &str) {
        if let Some(store) = self.store.as_ref() {
            store.delete(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::Cell;
    use std::convert::Infallible;
    use tempfile::tempdir;

    #[test]
    fn miss_computes_once_and_saves() {
        let store = Arc::new(MemoryCache::new());
        let gate = CacheGate::new(Some(store.clone()));
        let calls = Cell::new(0);

        let value: String = gate
            .get_or_compute("k", || {
                calls.set(calls.get() + 1);
                Ok::<_, Infallible>("fresh".to_string())
            })
            .expect("value");
        assert_eq!(value, "fresh");
        assert_eq!(calls.get(), 1);
        assert_eq!(store.fetch("k"), Some(json!("fresh")));
    }

    #[test]
    fn hit_skips_compute() {
        let store = Arc::new(MemoryCache::new());
        store.save("k", json!("stored"));
        let gate = CacheGate::new(Some(store));
        let calls = Cell::new(0);

        for _ in 0..2 {
            let value: String = gate
                .get_or_compute("k", || {
                    calls.set(calls.get() + 1);
                    Ok::<_, Infallible>("fresh".to_string())
                })
                .expect("value");
            assert_eq!(value, "stored");
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn disabled_gate_always_computes() {
        let gate = CacheGate::disabled();
        let calls = Cell::new(0);
        for _ in 0..3 {
            let _: u32 = gate
                .get_or_compute("k", || {
                    calls.set(calls.get() + 1);
                    Ok::<_, Infallible>(7)
                })
                .expect("value");
        }
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn compute_error_is_not_cached() {
        let store = Arc::new(MemoryCache::new());
        let gate = CacheGate::new(Some(store.clone()));
        let result: Result<String, &str> = gate.get_or_compute("k", || Err("boom"));
        assert_eq!(result, Err("boom"));
        assert!(!store.contains("k"));
    }

    #[test]
    fn undecodable_entry_is_a_miss() {
        let store = Arc::new(MemoryCache::new());
        store.save("k", json!({"not": "a number"}));
        let gate = CacheGate::new(Some(store.clone()));
        let value: u32 = gate
            .get_or_compute("k", || Ok::<_, Infallible>(5))
            .expect("value");
        assert_eq!(value, 5);
        assert_eq!(store.fetch("k"), Some(json!(5)));
    }

    #[test]
    fn file_cache_round_trips_and_deletes() {
        let temp = tempdir().expect("tempdir");
        let cache = FileCache::new(temp.path().join("cache")).expect("cache");
        assert!(!cache.contains("requirejs_config"));

        cache.save("requirejs_config", json!("require.config({});"));
        assert!(cache.contains("requirejs_config"));
        assert_eq!(
            cache.fetch("requirejs_config"),
            Some(json!("require.config({});"))
        );

        cache.delete("requirejs_config");
        assert!(!cache.contains("requirejs_config"));
        cache.delete("requirejs_config");
    }

    #[test]
    fn file_cache_keeps_similar_keys_apart() {
        let temp = tempdir().expect("tempdir");
        let cache = FileCache::new(temp.path()).expect("cache");
        cache.save("b/c", json!("slash"));
        cache.save("b_c", json!("underscore"));
        cache.save("b%2Fc", json!("escaped"));

        assert_eq!(cache.fetch("b/c"), Some(json!("slash")));
        assert_eq!(cache.fetch("b_c"), Some(json!("underscore")));
        assert_eq!(cache.fetch("b%2Fc"), Some(json!("escaped")));
        assert!(temp.path().join("b_c.json").is_file());
        assert!(temp.path().join("b%2Fc.json").is_file());
    }

    #[test]
    fn file_cache_clear_removes_entries() {
        let temp = tempdir().expect("tempdir");
        let cache = FileCache::new(temp.path()).expect("cache");
        cache.save("a", json!(1));
        cache.save("b/c", json!(2));
        cache.clear().expect("clear");
        assert!(!cache.contains("a"));
        assert!(!cache.contains("b/c"));
    }
}
