use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

use crate::entry::Entry;
use crate::store::Store;

/// Configuration for MokaStore.
#[derive(Debug, Clone)]
pub struct MokaStoreConfig {
    /// Maximum number of entries the cache can hold.
    pub max_capacity: u64,

    /// Hard retention bound: entries are dropped this long after insertion,
    /// regardless of their own `expires_at`. Past this point the stale
    /// fallback for a key is lost. `None` retains entries until capacity
    /// eviction.
    pub time_to_live: Option<Duration>,

    /// Hard retention bound on idle time: entries not accessed within this
    /// duration are dropped. `None` disables idle-based retention.
    pub time_to_idle: Option<Duration>,
}

impl Default for MokaStoreConfig {
    fn default() -> Self {
        MokaStoreConfig {
            max_capacity: 10_000,
            time_to_live: None,
            time_to_idle: None,
        }
    }
}

/// High-performance concurrent cache store using Moka.
///
/// MokaStore provides:
/// - Lock-free concurrent access for reads and writes
/// - Automatic background eviction with configurable policies
/// - Excellent performance under high concurrency (>8 threads)
/// - Suitable for large cache sizes (>10,000 items)
///
/// Entries past their own `expires_at` are still returned from `get` so the
/// cache layer can serve them as stale fallbacks; only Moka's capacity and
/// retention policies remove them.
pub struct MokaStore<V>
where
    V: Clone + Send + Sync,
{
    cache: Cache<String, Entry<V>>,
}

impl<V> MokaStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a new MokaStore with the given configuration.
    ///
    /// # Example
    /// ```ignore
    /// let config = MokaStoreConfig {
    ///     max_capacity: 10_000,
    ///     time_to_live: Some(Duration::from_secs(24 * 3600)),
    ///     time_to_idle: None,
    /// };
    /// let store = MokaStore::new(config);
    /// ```
    pub fn new(config: MokaStoreConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);

        if let Some(ttl) = config.time_to_live {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.time_to_idle {
            builder = builder.time_to_idle(tti);
        }

        MokaStore {
            cache: builder.build(),
        }
    }

    /// Get cache statistics (for monitoring/debugging).
    pub fn stats(&self) -> (u64, u64) {
        let entry_count = self.cache.entry_count();
        let weighted_size = self.cache.weighted_size();
        (entry_count, weighted_size)
    }
}

#[async_trait]
impl<V> Store<V> for MokaStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "moka"
    }

    async fn get(&self, key: &str) -> Option<Entry<V>> {
        self.cache.get(key).await
    }

    async fn set(&self, key: &str, entry: Entry<V>) {
        // Moka handles capacity eviction automatically
        self.cache.insert(key.to_string(), entry).await;
    }

    async fn remove(&self, keys: &[&str]) {
        for key in keys {
            self.cache.invalidate(*key).await;
        }
    }
}
