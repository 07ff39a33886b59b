//! Cache Store Module
//!
//! Single-threaded cache engine combining HashMap storage with LRU tracking
//! and expire-after-access TTL.

use std::collections::HashMap;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL in seconds applied to every entry
    ttl_seconds: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` values, each expiring
    /// `ttl_seconds` after its last access.
    pub fn new(max_entries: usize, ttl_seconds: u64) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            ttl_seconds,
        }
    }

    // == Insert ==
    /// Stores a value, replacing any previous one and restarting its TTL.
    ///
    /// At capacity the least recently used entry is evicted first. A store
    /// with zero capacity keeps nothing.
    pub fn insert(&mut self, key: String, value: String) {
        if self.max_entries == 0 {
            return;
        }

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
            }
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(value, self.ttl_seconds));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value if present and not expired.
    ///
    /// A hit refreshes both the LRU position and the TTL window. An expired
    /// entry is dropped and counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired() {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            return None;
        }

        entry.touch();
        let value = entry.value.clone();
        self.lru.touch(key);
        self.stats.record_hit();
        Some(value)
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired_keys.len());
        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
