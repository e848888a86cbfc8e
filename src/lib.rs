//! timed-cache - a time-bounded cache for externally fetched data
//!
//! This library provides a process-wide key-value cache where every entry has
//! an independent expiry and a caller-supplied refresh function:
//! - Per-entry TTL with single-flight refresh (at most one concurrent fetch per key)
//! - Stale fallback: an expired value keeps serving while a refresh is underway
//!   or after a refresh fails
//! - Pluggable stores (HashMap, Moka) and a metrics middleware
//! - Configurable upper bound on refresh duration
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use timed_cache::TimedCache;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Construct once at process start; clones share state.
//!     let cache: TimedCache<String> = TimedCache::builder()
//!         .refresh_timeout(Duration::from_secs(10))
//!         .build();
//!
//!     // The refresh function owns the fetch and parse; the cache only
//!     // decides whether to invoke it.
//!     let posts = cache
//!         .get("feed-posts", Duration::from_secs(3600), |_key| async {
//!             let body = fetch_feed().await?;
//!             Ok(first_item_content(&body))
//!         })
//!         .await;
//! }
//! ```

mod builder;
mod cache;
mod entry;
mod error;
mod store;
pub mod stores;
mod utils;

// Re-export public API
pub use builder::TimedCacheBuilder;
pub use cache::{BoxError, TimedCache};
pub use entry::Entry;
pub use error::RefreshError;
pub use store::Store;
pub use stores::memory::{EvictOnSetConfig, HashMapStore, HashMapStoreConfig};
pub use stores::metrics::{CacheMetric, EntryState, MetricsSink, MetricsStore};
pub use stores::moka::{MokaStore, MokaStoreConfig};
