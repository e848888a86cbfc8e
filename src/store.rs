use async_trait::async_trait;

use crate::entry::Entry;

/// A store is a common interface for storing, reading and deleting cache entries.
///
/// Store reads are infallible: the in-process backends cannot fail, and
/// `RefreshError` stays the only error the cache produces.
///
/// Implementations must return expired entries from `get`; the cache layer
/// decides whether an expired value is still servable as a stale fallback.
/// Stores may bound capacity, but should not prune entries purely because they
/// expired, since that discards the fallback.
#[async_trait]
pub trait Store<V>: Send + Sync
where
    V: Clone + Send + Sync,
{
    /// A name for logging/metrics.
    ///
    /// # Example
    /// - "hashmap"
    /// - "moka"
    fn name(&self) -> &'static str;

    /// Return the stored entry, expired or not.
    ///
    /// The response must be `None` for cache misses.
    async fn get(&self, key: &str) -> Option<Entry<V>>;

    /// Sets the entry for the given key, superseding any previous entry.
    async fn set(&self, key: &str, entry: Entry<V>);

    /// Removes the key(s) from the store.
    async fn remove(&self, keys: &[&str]);
}
