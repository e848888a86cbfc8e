use serde::{Deserialize, Serialize};

/// A cache entry containing a value and its expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry<V> {
    /// The cached value.
    pub value: V,

    /// Unix timestamp in milliseconds.
    /// At or after this time the entry is expired and only usable as a
    /// stale fallback while a refresh is attempted.
    pub expires_at: i64,
}

impl<V> Entry<V> {
    /// Create a new cache entry.
    pub fn new(value: V, expires_at: i64) -> Self {
        Entry { value, expires_at }
    }

    /// Check if the entry is still fresh.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at
    }

    /// Check if the entry is expired. An entry read at exactly `expires_at`
    /// is expired, not fresh.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at
    }
}
