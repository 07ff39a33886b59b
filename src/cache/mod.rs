//! Cache Module
//!
//! The cache capability consumed by the client, its default in-memory
//! implementation (LRU eviction, expire-after-access TTL) and the cache-key hasher.

mod entry;
mod keys;
mod lru;
mod memory;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use keys::cache_key;
pub use lru::LruTracker;
pub use memory::LruApiCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Capacity of the default cache
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// TTL in seconds used when the configuration does not set one
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

// == Cache Capability ==
/// Storage for formatted responses, keyed by [`cache_key`] output.
///
/// Implementations must tolerate concurrent `get`/`put` from several callers.
/// Eviction is entirely up to the implementation; the client never removes keys.
pub trait ApiCache: Send + Sync {
    /// Returns the cached value for `key`, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: String, value: String);
}
