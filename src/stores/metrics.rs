//! Metrics middleware for cache stores.
//!
//! This module provides a `MetricsStore` wrapper that emits metrics for all
//! cache operations (reads, writes, removes) to a user-provided sink.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use timed_cache::{MetricsStore, MokaStore, MokaStoreConfig, Store, TimedCache};
//!
//! let sink = Arc::new(MyMetricsSink::new());
//!
//! let moka = Arc::new(MokaStore::new(MokaStoreConfig::default()));
//! let store: Arc<dyn Store<String>> = Arc::new(MetricsStore::new(moka, sink.clone()));
//!
//! // Use in TimedCache - metrics emitted automatically
//! let cache = TimedCache::new(store);
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use crate::entry::Entry;
use crate::store::Store;
use crate::utils::now_ms;

/// Status of a cache entry on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Entry is fresh (before `expires_at`).
    Fresh,
    /// Entry is past `expires_at` and only servable as a stale fallback.
    Expired,
}

/// Metrics emitted by the MetricsStore wrapper.
#[derive(Debug, Clone)]
pub enum CacheMetric {
    /// Emitted on every cache read (get) operation.
    Read {
        /// The cache key that was read.
        key: String,
        /// Whether the key was found in the store.
        hit: bool,
        /// State of the entry (only present when hit=true).
        state: Option<EntryState>,
        /// Latency of the operation in milliseconds.
        latency_ms: f64,
        /// Name of the wrapped store (from Store::name()).
        store: String,
    },
    /// Emitted on every cache write (set) operation.
    Write {
        /// The cache key that was written.
        key: String,
        /// Latency of the operation in milliseconds.
        latency_ms: f64,
        /// Name of the wrapped store (from Store::name()).
        store: String,
    },
    /// Emitted on every cache remove operation.
    Remove {
        /// Number of keys in the remove batch.
        key_count: usize,
        /// First key in the batch (for debugging/identification).
        first_key: Option<String>,
        /// Latency of the operation in milliseconds.
        latency_ms: f64,
        /// Name of the wrapped store (from Store::name()).
        store: String,
    },
}

/// Trait for receiving cache metrics.
///
/// Implement this trait to collect metrics from `MetricsStore`.
///
/// # Example
///
/// ```ignore
/// use std::sync::Mutex;
/// use async_trait::async_trait;
/// use timed_cache::{CacheMetric, MetricsSink};
///
/// struct BufferedSink {
///     buffer: Mutex<Vec<CacheMetric>>,
/// }
///
/// #[async_trait]
/// impl MetricsSink for BufferedSink {
///     fn emit(&self, metric: CacheMetric) {
///         self.buffer.lock().unwrap().push(metric);
///     }
///
///     async fn flush(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///         // Send buffered metrics to your backend
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Emit a single metric.
    ///
    /// This is called synchronously in the hot path of cache operations.
    /// Implementations should be fast (e.g., buffer metrics in memory).
    fn emit(&self, metric: CacheMetric);

    /// Flush any buffered metrics.
    ///
    /// Called when the caller wants to ensure all metrics are persisted.
    /// This is typically called at shutdown or at periodic intervals.
    async fn flush(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// A store wrapper that emits metrics for all operations.
///
/// `MetricsStore` wraps any `Store` implementation and emits metrics
/// for read, write, and remove operations to a user-provided sink.
pub struct MetricsStore<V>
where
    V: Clone + Send + Sync,
{
    inner: Arc<dyn Store<V>>,
    sink: Arc<dyn MetricsSink>,
    store_name: String,
}

impl<V> MetricsStore<V>
where
    V: Clone + Send + Sync,
{
    /// Create a new MetricsStore wrapping the given store.
    ///
    /// # Arguments
    /// * `inner` - The store to wrap
    /// * `sink` - The metrics sink to emit metrics to
    pub fn new(inner: Arc<dyn Store<V>>, sink: Arc<dyn MetricsSink>) -> Self {
        let store_name = inner.name().to_string();
        MetricsStore {
            inner,
            sink,
            store_name,
        }
    }

    /// Get a reference to the metrics sink.
    pub fn sink(&self) -> &Arc<dyn MetricsSink> {
        &self.sink
    }

    fn elapsed_ms(start: Instant) -> f64 {
        start.elapsed().as_secs_f64() * 1000.0
    }
}

#[async_trait]
impl<V> Store<V> for MetricsStore<V>
where
    V: Clone + Send + Sync,
{
    fn name(&self) -> &'static str {
        "metrics"
    }

    async fn get(&self, key: &str) -> Option<Entry<V>> {
        let start = Instant::now();
        let result = self.inner.get(key).await;
        let latency_ms = Self::elapsed_ms(start);

        let (hit, state) = match &result {
            Some(entry) => {
                let state = if entry.is_fresh(now_ms()) {
                    EntryState::Fresh
                } else {
                    EntryState::Expired
                };
                (true, Some(state))
            }
            None => (false, None),
        };

        self.sink.emit(CacheMetric::Read {
            key: key.to_string(),
            hit,
            state,
            latency_ms,
            store: self.store_name.clone(),
        });

        result
    }

    async fn set(&self, key: &str, entry: Entry<V>) {
        let start = Instant::now();
        self.inner.set(key, entry).await;
        let latency_ms = Self::elapsed_ms(start);

        self.sink.emit(CacheMetric::Write {
            key: key.to_string(),
            latency_ms,
            store: self.store_name.clone(),
        });
    }

    async fn remove(&self, keys: &[&str]) {
        let start = Instant::now();
        self.inner.remove(keys).await;
        let latency_ms = Self::elapsed_ms(start);

        self.sink.emit(CacheMetric::Remove {
            key_count: keys.len(),
            first_key: keys.first().map(|k| k.to_string()),
            latency_ms,
            store: self.store_name.clone(),
        });
    }
}
