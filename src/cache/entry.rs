//! Cache Entry Module
//!
//! A cached response body with expire-after-access bookkeeping.

use chrono::Utc;

// == Cache Entry ==
/// A single cached value and its access-based expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored response text
    pub value: String,
    /// Expiration timestamp (Unix milliseconds), pushed forward on every access
    pub expires_at: u64,
    ttl_ms: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl_seconds` after its last access.
    pub fn new(value: String, ttl_seconds: u64) -> Self {
        let now = current_timestamp_ms();
        let ttl_ms = ttl_seconds.saturating_mul(1000);

        Self {
            value,
            expires_at: now.saturating_add(ttl_ms),
            ttl_ms,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches `expires_at`,
    /// so a zero TTL entry is never served.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Touch ==
    /// Records an access, restarting the TTL window.
    pub fn touch(&mut self) {
        self.expires_at = current_timestamp_ms().saturating_add(self.ttl_ms);
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}
