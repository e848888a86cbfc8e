//! Builder API for configuring a `TimedCache` instance.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::TimedCache;
use crate::store::Store;
use crate::stores::memory::{HashMapStore, HashMapStoreConfig};

/// Builder for a `TimedCache`.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use std::time::Duration;
/// use timed_cache::{MokaStore, MokaStoreConfig, TimedCache};
///
/// let cache: TimedCache<String> = TimedCache::builder()
///     .store(Arc::new(MokaStore::new(MokaStoreConfig::default())))
///     .refresh_timeout(Duration::from_secs(10))
///     .build();
/// ```
pub struct TimedCacheBuilder<V>
where
    V: Clone + Send + Sync + 'static,
{
    store: Option<Arc<dyn Store<V>>>,
    refresh_timeout: Option<Duration>,
}

impl<V> TimedCacheBuilder<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a new builder.
    pub fn new() -> Self {
        TimedCacheBuilder {
            store: None,
            refresh_timeout: None,
        }
    }

    /// Use the given store instead of the default `HashMapStore`.
    pub fn store(mut self, store: Arc<dyn Store<V>>) -> Self {
        self.store = Some(store);
        self
    }

    /// Upper bound on a single refresh. A refresh exceeding it fails with
    /// `RefreshError::Timeout` and its waiters are unblocked with that error.
    ///
    /// Refresh functions are expected to carry their own network timeouts;
    /// this is a last-resort bound so a hung origin cannot pin a key's
    /// in-flight marker forever.
    pub fn refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = Some(timeout);
        self
    }

    /// Build the cache.
    pub fn build(self) -> TimedCache<V> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(HashMapStore::new(HashMapStoreConfig::default())));
        TimedCache::with_config(store, self.refresh_timeout)
    }
}

impl<V> Default for TimedCacheBuilder<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
