use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};

use crate::builder::TimedCacheBuilder;
use crate::entry::Entry;
use crate::error::RefreshError;
use crate::store::Store;
use crate::utils::now_ms;

/// Boxed error type accepted from refresh functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A refresh in progress for one key. Cloneable so every concurrent caller
/// can await the same outcome.
type Flight<V> = Shared<BoxFuture<'static, Result<V, RefreshError>>>;

/// How a caller ended up attached to a flight.
enum FlightHandle<V> {
    /// No flight was needed: another caller's refresh landed a fresh value
    /// between this caller's store lookup and its flight attempt.
    Fresh(V),
    /// A refresh started earlier by another caller.
    Joined(Flight<V>),
    /// A refresh this caller started; it is the sole refresher.
    Started(Flight<V>),
}

/// Time-bounded cache for externally fetched data.
///
/// Each entry carries its own expiry; callers supply a refresh function and a
/// TTL with every `get`. The cache guarantees at most one concurrent refresh
/// per key, and serves the previous (stale) value instead of waiting whenever
/// a refresh for an expired key is already underway.
///
/// Construct one instance at process start and pass clones around - cloning
/// shares the underlying store and in-flight state.
pub struct TimedCache<V>
where
    V: Clone + Send + Sync,
{
    store: Arc<dyn Store<V>>,
    /// Upper bound on a single refresh. Past it the flight fails with
    /// `RefreshError::Timeout` and waiters are unblocked.
    refresh_timeout: Option<Duration>,
    /// To prevent concurrent refreshes of the same key, all refreshes are deduplicated.
    in_flight: Arc<Mutex<HashMap<String, Flight<V>>>>,
}

impl<V> Clone for TimedCache<V>
where
    V: Clone + Send + Sync,
{
    fn clone(&self) -> Self {
        TimedCache {
            store: Arc::clone(&self.store),
            refresh_timeout: self.refresh_timeout,
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<V> TimedCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a new cache over the given store, with no refresh timeout.
    pub fn new(store: Arc<dyn Store<V>>) -> Self {
        TimedCache {
            store,
            refresh_timeout: None,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Start building a cache with non-default configuration.
    pub fn builder() -> TimedCacheBuilder<V> {
        TimedCacheBuilder::new()
    }

    pub(crate) fn with_config(store: Arc<dyn Store<V>>, refresh_timeout: Option<Duration>) -> Self {
        TimedCache {
            store,
            refresh_timeout,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get the cached value for `key`, refreshing it when needed.
    ///
    /// * A fresh entry is returned immediately; `refresh` is not invoked.
    /// * On a miss the caller either joins the in-flight refresh or starts
    ///   one, and receives its value or its `RefreshError`.
    /// * On an expired entry the caller serves the stale value immediately if
    ///   a refresh is already underway; otherwise it becomes the sole
    ///   refresher, returning the fresh value on success and falling back to
    ///   the stale value (logging the error) on failure.
    ///
    /// `expires_at` for a refreshed entry is the refresh start time plus
    /// `ttl`, so a slow origin does not extend an entry's lifetime.
    ///
    /// # Arguments
    /// * `key` - Non-empty identifier, stable across calls
    /// * `ttl` - Positive duration the refreshed value stays fresh
    /// * `refresh` - Function producing the value (receives the key); this is
    ///   where network I/O and parsing live, supplied by the caller
    pub async fn get<F, Fut>(&self, key: &str, ttl: Duration, refresh: F) -> Result<V, RefreshError>
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, BoxError>> + Send + 'static,
    {
        match self.store.get(key).await {
            Some(entry) if entry.is_fresh(now_ms()) => {
                tracing::trace!(key, "serving fresh value");
                Ok(entry.value)
            }
            Some(entry) => match self.flight(key, ttl, refresh).await {
                FlightHandle::Fresh(value) => Ok(value),
                FlightHandle::Joined(_) => {
                    // A refresh is already underway; serve stale without waiting.
                    tracing::debug!(key, "refresh in flight, serving stale value");
                    Ok(entry.value)
                }
                FlightHandle::Started(flight) => match flight.await {
                    Ok(fresh) => Ok(fresh),
                    Err(err) => {
                        // A failed revalidation with a fallback available is
                        // logged, not propagated. The stale value stays
                        // servable until a refresh succeeds.
                        tracing::warn!(key, error = %err, "refresh failed, serving stale value");
                        Ok(entry.value)
                    }
                },
            },
            None => match self.flight(key, ttl, refresh).await {
                FlightHandle::Fresh(value) => Ok(value),
                // First-ever fetch: everyone waits, and a failure propagates
                // since there is nothing to fall back on.
                FlightHandle::Joined(flight) | FlightHandle::Started(flight) => flight.await,
            },
        }
    }

    /// Return the cached value if it is fresh.
    ///
    /// Never triggers a refresh; expired entries read as `None`.
    pub async fn peek(&self, key: &str) -> Option<V> {
        let entry = self.store.get(key).await?;
        if entry.is_fresh(now_ms()) {
            Some(entry.value)
        } else {
            None
        }
    }

    /// Manually seed the cache, e.g. for warm-up.
    pub async fn set(&self, key: &str, value: V, ttl: Duration) {
        let entry = Entry::new(value, now_ms() + ttl.as_millis() as i64);
        self.store.set(key, entry).await;
    }

    /// Remove the key from the cache.
    pub async fn remove(&self, key: &str) {
        self.store.remove(&[key]).await;
    }

    /// Join the in-flight refresh for `key`, or start one.
    async fn flight<F, Fut>(&self, key: &str, ttl: Duration, refresh: F) -> FlightHandle<V>
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, BoxError>> + Send + 'static,
    {
        let mut in_flight = self.in_flight.lock().await;
        if let Some(existing) = in_flight.get(key) {
            return FlightHandle::Joined(existing.clone());
        }

        // A flight observed as missing before the lock may have completed by
        // now; serve its stored value instead of fetching again.
        if let Some(entry) = self.store.get(key).await {
            if entry.is_fresh(now_ms()) {
                return FlightHandle::Fresh(entry.value);
            }
        }

        let flight = self.spawn_flight(key, ttl, refresh);
        in_flight.insert(key.to_string(), flight.clone());
        FlightHandle::Started(flight)
    }

    /// Spawn the refresh on its own task so it runs to completion even if the
    /// initiating caller is cancelled. The returned future is shared by every
    /// waiter.
    fn spawn_flight<F, Fut>(&self, key: &str, ttl: Duration, refresh: F) -> Flight<V>
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, BoxError>> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let in_flight = Arc::clone(&self.in_flight);
        let refresh_timeout = self.refresh_timeout;
        let key = key.to_string();
        let ttl_ms = ttl.as_millis() as i64;

        let (tx, rx) = oneshot::channel();
        let task_key = key.clone();

        tokio::spawn(async move {
            let key = task_key;
            let started_at = now_ms();
            // The refresh runs on its own task so a panicking refresh future
            // cannot unwind past the marker cleanup below.
            let mut origin = tokio::spawn({
                let key = key.clone();
                async move { refresh(key).await }
            });

            let outcome = match refresh_timeout {
                Some(limit) => match tokio::time::timeout(limit, &mut origin).await {
                    Ok(joined) => flight_outcome(&key, joined),
                    Err(_) => {
                        origin.abort();
                        Err(RefreshError::timeout(key.as_str(), limit))
                    }
                },
                None => flight_outcome(&key, origin.await),
            };

            match &outcome {
                Ok(value) => {
                    // Expiry counts from refresh start, not completion.
                    store
                        .set(&key, Entry::new(value.clone(), started_at + ttl_ms))
                        .await;
                    tracing::debug!(key = %key, ttl_ms, "refresh succeeded");
                }
                Err(err) => {
                    // The previous entry, if any, stays untouched.
                    tracing::debug!(key = %key, error = %err, "refresh failed");
                }
            }

            in_flight.lock().await.remove(&key);

            // All waiters may have been cancelled; the entry is stored either way.
            let _ = tx.send(outcome);
        });

        rx.map(move |res| match res {
            Ok(outcome) => outcome,
            Err(_) => Err(RefreshError::origin(
                key,
                "refresh task aborted before completing",
            )),
        })
        .boxed()
        .shared()
    }
}

/// Collapse a refresh task's join result into the flight outcome. A panic
/// inside the refresh future becomes an origin failure here; the flight must
/// keep running to clear the in-flight marker and unblock waiters.
fn flight_outcome<V>(
    key: &str,
    joined: Result<Result<V, BoxError>, tokio::task::JoinError>,
) -> Result<V, RefreshError> {
    match joined {
        Ok(result) => result.map_err(|e| RefreshError::origin(key, e.to_string())),
        Err(join_err) => Err(RefreshError::origin(
            key,
            format!("refresh task failed: {}", join_err),
        )),
    }
}
