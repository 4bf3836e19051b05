//! Catalog cache trait and statistics.

use std::time::Duration;

use async_trait::async_trait;
use mosaic_core::Product;

/// Key under which the merged product list is cached.
pub const ALL_PRODUCTS_KEY: &str = "products:all";

/// Cache backend for the merged product list.
///
/// Implementations must be safe for concurrent use. Two concurrent misses
/// may both call `set`; the last writer wins.
#[async_trait]
pub trait ProductCatalogCache: Send + Sync {
    /// Get the cached list if present and unexpired.
    ///
    /// A hit resets the sliding window.
    async fn get(&self) -> Option<Vec<Product>>;

    /// Replace the cached list, restarting both expiry windows.
    async fn set(&self, products: Vec<Product>, ttl: Duration);

    /// Get cache statistics.
    async fn stats(&self) -> CacheStats;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries evicted because a window elapsed.
    pub expirations: u64,
    /// Number of entries currently in cache (0 or 1).
    pub entry_count: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
