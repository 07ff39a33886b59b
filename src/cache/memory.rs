//! Default in-process cache shared by every clone of a configuration.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::cache::{ApiCache, CacheStats, CacheStore, DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_ENTRIES};

// == LRU Api Cache ==
/// Thread-safe bounded cache with LRU eviction and expire-after-access TTL.
#[derive(Debug)]
pub struct LruApiCache {
    store: Mutex<CacheStore>,
}

impl LruApiCache {
    /// Creates a cache holding at most `max_entries` responses, each kept for
    /// `ttl_seconds` after its last access.
    pub fn new(max_entries: usize, ttl_seconds: u64) -> Self {
        Self {
            store: Mutex::new(CacheStore::new(max_entries, ttl_seconds)),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.lock().purge_expired()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // Recovers the guard from a poisoned lock.
    fn lock(&self) -> MutexGuard<'_, CacheStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LruApiCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_CACHE_TTL_SECS)
    }
}

impl ApiCache for LruApiCache {
    fn get(&self, key: &str) -> Option<String> {
        let value = self.lock().get(key);
        trace!(key, hit = value.is_some(), "cache lookup");
        value
    }

    fn put(&self, key: String, value: String) {
        self.lock().insert(key, value);
    }
}
