use parking_lot::Mutex;
use requirekit_core::{CacheStore, MemoryCache};
use serde_json::Value;

/// Memory cache that counts every call made through the store contract.
#[derive(Debug, Default)]
pub struct CountingCache {
    inner: MemoryCache,
    counts: Mutex<CacheCounts>,
}

/// Call counters for [`CountingCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCounts {
    pub contains: usize,
    pub fetch: usize,
    pub save: usize,
    pub delete: usize,
}

impl CountingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> CacheCounts {
        *self.counts.lock()
    }
}

impl CacheStore for CountingCache {
    fn contains(&self, key: &str) -> bool {
        self.counts.lock().contains += 1;
        self.inner.contains(key)
    }

    fn fetch(&self, key: &str) -> Option<Value> {
        self.counts.lock().fetch += 1;
        self.inner.fetch(key)
    }

    fn save(&self, key: &str, value: Value) {
        self.counts.lock().save += 1;
        self.inner.save(key, value);
    }

    fn delete(&self, key: &str) {
        self.counts.lock().delete += 1;
        self.inner.delete(key);
    }
}
