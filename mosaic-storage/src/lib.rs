//! Mosaic Storage - Process-Local Gateway State
//!
//! Shared mutable state used by the gateway's request path:
//!
//! - [`ClaimSet`]: atomic claim-if-absent over any hashable key, the
//!   primitive behind both the header gate and the idempotency ledger
//! - [`IdempotencyLedger`]: per-operation dedupe claims keyed by
//!   [`mosaic_core::DedupeKey`]
//! - [`cache`]: the cache-aside product catalog cache
//!
//! Everything here lives for the process lifetime. Nothing is shared
//! between processes.

pub mod cache;
pub mod claims;

pub use cache::{
    cache_ttl_from_minutes, CacheStats, InMemoryCatalogCache, ProductCatalogCache,
    ALL_PRODUCTS_KEY, DEFAULT_CACHE_TTL,
};
pub use claims::{ClaimOutcome, ClaimSet, IdempotencyLedger};
