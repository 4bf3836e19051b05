//! Cache-aside storage for the merged product catalog.
//!
//! There is exactly one cacheable read: the full merged product list. The
//! caller decides when to populate it; the cache only decides when an entry
//! has expired.
//!
//! # Expiry
//!
//! Every entry carries two windows:
//!
//! - a sliding window of `ttl`, reset by every successful `get`
//! - an absolute window of `2 * ttl` from the last `set`, which bounds
//!   staleness under continuous read traffic
//!
//! Whichever fires first evicts the entry.

pub mod config;
pub mod memory;
pub mod traits;

pub use config::{cache_ttl_from_minutes, DEFAULT_CACHE_TTL};
pub use memory::InMemoryCatalogCache;
pub use traits::{CacheStats, ProductCatalogCache, ALL_PRODUCTS_KEY};
