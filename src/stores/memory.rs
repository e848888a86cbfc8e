use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::entry::Entry;
use crate::store::Store;
use crate::utils::rand_simple;

/// Configuration for eviction on set operations.
#[derive(Debug, Clone)]
pub struct EvictOnSetConfig {
    /// Provide a number between 0 and 1 to calculate whether eviction should run on each set.
    ///
    /// - `1.0` -> run eviction on every `set`
    /// - `0.5` -> run eviction on every 2nd `set` (on average)
    /// - `0.0` -> disable eviction
    pub frequency: f64,

    /// Remove items until the number of items in the map is lower than `max_items`.
    /// Entries closest to (or past) their expiry are removed first.
    pub max_items: usize,
}

/// Configuration for HashMapStore.
#[derive(Debug, Clone, Default)]
pub struct HashMapStoreConfig {
    /// Bound the map size on `set` operations. `None` keeps every entry for
    /// the process lifetime, which matches low key cardinality workloads.
    pub evict_on_set: Option<EvictOnSetConfig>,
}

/// Thread-safe in-memory cache store using HashMap with RwLock.
///
/// This is a simple, zero-dependency store suitable for:
/// - Low to moderate concurrency (<8 threads)
/// - Small to medium cache sizes (<1000 items)
/// - Applications prioritizing simplicity over performance
///
/// Expired entries are retained so they stay servable as stale fallbacks;
/// only the optional capacity bound removes them.
///
/// For high-concurrency scenarios, consider using `MokaStore` instead.
pub struct HashMapStore<V>
where
    V: Clone + Send + Sync,
{
    state: RwLock<HashMap<String, Entry<V>>>,
    evict_on_set: Option<EvictOnSetConfig>,
}

impl<V> HashMapStore<V>
where
    V: Clone + Send + Sync,
{
    /// Create a new HashMapStore with the given configuration.
    pub fn new(config: HashMapStoreConfig) -> Self {
        HashMapStore {
            state: RwLock::new(HashMap::new()),
            evict_on_set: config.evict_on_set,
        }
    }

    /// Run eviction if configured and random check passes.
    async fn maybe_evict(&self) {
        let Some(ref config) = self.evict_on_set else {
            return;
        };

        if config.frequency <= 0.0 {
            return;
        }

        let should_evict = if config.frequency >= 1.0 {
            true
        } else {
            rand_simple() < config.frequency
        };

        if !should_evict {
            return;
        }

        let mut state = self.state.write().await;

        if state.len() > config.max_items {
            // Remove entries closest to expiry first
            let mut entries: Vec<_> = state
                .iter()
                .map(|(k, v)| (k.clone(), v.expires_at))
                .collect();
            entries.sort_by_key(|(_, expires_at)| *expires_at);

            let to_remove = state.len() - config.max_items;
            for (key, _) in entries.into_iter().take(to_remove) {
                state.remove(&key);
            }
        }
    }
}

impl<V> Default for HashMapStore<V>
where
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new(HashMapStoreConfig::default())
    }
}

#[async_trait]
impl<V> Store<V> for HashMapStore<V>
where
    V: Clone + Send + Sync,
{
    fn name(&self) -> &'static str {
        "hashmap"
    }

    async fn get(&self, key: &str) -> Option<Entry<V>> {
        let state = self.state.read().await;
        state.get(key).cloned()
    }

    async fn set(&self, key: &str, entry: Entry<V>) {
        {
            let mut state = self.state.write().await;
            state.insert(key.to_string(), entry);
        }

        self.maybe_evict().await;
    }

    async fn remove(&self, keys: &[&str]) {
        let mut state = self.state.write().await;

        for key in keys {
            state.remove(*key);
        }
    }
}
