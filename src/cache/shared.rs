//! Shared cache handle
//!
//! Wraps the single-owner `LruCache` behind one mutex so that every
//! worker's get/put/stats is atomic with respect to the others. The lock
//! is held only for the O(1) body of one operation, never across I/O, so
//! a stalled client cannot stall the cache for anyone else.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{CacheStats, LruCache};

/// Cloneable handle to the one cache instance all connections share
#[derive(Clone)]
pub struct SharedCache {
    inner: Arc<Mutex<LruCache>>,
}

impl SharedCache {
    /// Create a shared cache holding at most `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Look up a key, returning an owned copy of the value on a hit
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().get(key).map(str::to_string)
    }

    /// Insert or overwrite a key; returns the previous value if any
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.inner.lock().put(key, value)
    }

    /// Occupancy snapshot
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl std::fmt::Debug for SharedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCache")
            .field("stats", &self.stats())
            .finish()
    }
}
