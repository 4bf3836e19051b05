//! In-memory catalog cache backend.

use std::time::Duration;

use async_trait::async_trait;
use mosaic_core::Product;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::traits::{CacheStats, ProductCatalogCache, ALL_PRODUCTS_KEY};

struct CacheEntry {
    products: Vec<Product>,
    sliding: Duration,
    stored_at: Instant,
    last_access: Instant,
}

impl CacheEntry {
    fn expired_at(&self, now: Instant) -> bool {
        let sliding_deadline = self.last_access.checked_add(self.sliding);
        let absolute_deadline = self
            .sliding
            .checked_mul(2)
            .and_then(|window| self.stored_at.checked_add(window));

        [sliding_deadline, absolute_deadline]
            .into_iter()
            .flatten()
            .any(|deadline| now >= deadline)
    }
}

#[derive(Default)]
struct CacheInner {
    entry: Option<CacheEntry>,
    stats: CacheStats,
}

/// Single-entry product cache held in process memory.
///
/// Expired entries are evicted lazily on the next `get`.
#[derive(Default)]
pub struct InMemoryCatalogCache {
    inner: Mutex<CacheInner>,
}

impl InMemoryCatalogCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductCatalogCache for InMemoryCatalogCache {
    async fn get(&self) -> Option<Vec<Product>> {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();

        match inner.entry.as_ref().map(|entry| entry.expired_at(now)) {
            None => {
                inner.stats.misses += 1;
                None
            }
            Some(true) => {
                inner.entry = None;
                inner.stats.expirations += 1;
                inner.stats.misses += 1;
                inner.stats.entry_count = 0;
                tracing::debug!(key = ALL_PRODUCTS_KEY, "Cache entry expired");
                None
            }
            Some(false) => {
                inner.stats.hits += 1;
                let entry = inner.entry.as_mut()?;
                entry.last_access = now;
                Some(entry.products.clone())
            }
        }
    }

    async fn set(&self, products: Vec<Product>, ttl: Duration) {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();
        tracing::debug!(
            key = ALL_PRODUCTS_KEY,
            count = products.len(),
            ttl_secs = ttl.as_secs(),
            "Cache entry stored"
        );
        inner.entry = Some(CacheEntry {
            products,
            sliding: ttl,
            stored_at: now,
            last_access: now,
        });
        inner.stats.entry_count = 1;
    }

    async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats.clone()
    }
}

impl std::fmt::Debug for InMemoryCatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCatalogCache").finish_non_exhaustive()
    }
}
