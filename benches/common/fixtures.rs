use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use timed_cache::BoxError;

/// Test data structure for benchmarks: a rendered content page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchPage {
    pub slug: String,
    pub body: String,
    pub revision: u32,
}

impl BenchPage {
    pub fn new(id: u64) -> Self {
        Self {
            slug: format!("page-{}", id),
            body: format!("<article>Content for page {}</article>", id),
            revision: (id % 1000) as u32,
        }
    }
}

/// Simulated external origin with configurable latency.
#[derive(Clone)]
pub struct FakeOrigin {
    data: Arc<HashMap<String, BenchPage>>,
    latency_ms: u64,
    fetch_count: Arc<AtomicUsize>,
}

impl FakeOrigin {
    pub fn new(num_pages: usize, latency_ms: u64) -> Self {
        let mut data = HashMap::new();
        for i in 0..num_pages {
            let page = BenchPage::new(i as u64);
            data.insert(format!("page:{}", i), page);
        }

        Self {
            data: Arc::new(data),
            latency_ms,
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn fetch(&self, key: &str) -> Result<BenchPage, BoxError> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);

        // Simulate network latency
        tokio::time::sleep(Duration::from_millis(self.latency_ms)).await;

        self.data
            .get(key)
            .cloned()
            .ok_or_else(|| format!("no such page: {}", key).into())
    }

    #[allow(dead_code)]
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::Relaxed)
    }

    #[allow(dead_code)]
    pub fn reset_count(&self) {
        self.fetch_count.store(0, Ordering::Relaxed);
    }
}

/// Generate test keys for different workload patterns
pub struct KeyGenerator {
    num_keys: usize,
}

impl KeyGenerator {
    pub fn new(num_keys: usize) -> Self {
        Self { num_keys }
    }

    /// Generate sequential keys (for cold cache tests)
    pub fn sequential(&self) -> Vec<String> {
        (0..self.num_keys).map(|i| format!("page:{}", i)).collect()
    }

    /// Generate random keys with uniform distribution
    #[allow(dead_code)]
    pub fn uniform_random(&self, count: usize) -> Vec<String> {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| format!("page:{}", rng.gen_range(0..self.num_keys)))
            .collect()
    }

    /// Generate keys for mixed workload (some hits, some misses)
    pub fn mixed(&self, hit_ratio: f64) -> Vec<String> {
        let mut rng = rand::thread_rng();
        let hot_key_count = (self.num_keys as f64 * hit_ratio) as usize;

        (0..1000)
            .map(|_| {
                if rng.gen_bool(hit_ratio) {
                    format!("page:{}", rng.gen_range(0..hot_key_count))
                } else {
                    format!("page:{}", rng.gen_range(hot_key_count..self.num_keys))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    async fn test_fake_origin() {
        use super::FakeOrigin;

        let origin = FakeOrigin::new(100, 10);

        let page = origin.fetch("page:0").await;
        assert!(page.is_ok());
        assert_eq!(page.unwrap().slug, "page-0");

        assert_eq!(origin.fetch_count(), 1);
    }

    #[test]
    fn test_key_generator() {
        use super::KeyGenerator;

        let key_gen = KeyGenerator::new(100);

        let seq = key_gen.sequential();
        assert_eq!(seq.len(), 100);
        assert_eq!(seq[0], "page:0");

        let uniform = key_gen.uniform_random(50);
        assert_eq!(uniform.len(), 50);
    }
}
