//! Mosaic Upstream - Backend System Clients
//!
//! Traits describing the two backend systems the gateway merges, and
//! `reqwest` implementations of them:
//!
//! - [`CatalogSource`] / [`CatalogClient`]: product identity, name and
//!   description, plus the write endpoints
//! - [`StockSource`] / [`StockClient`]: quantity on hand
//!
//! Every call is independent. Nothing here retries.

mod catalog;
mod http;
mod stock;

use async_trait::async_trait;
use mosaic_core::{Product, UpstreamError};
use serde_json::Value;

pub use catalog::CatalogClient;
pub use http::DEFAULT_UPSTREAM_TIMEOUT;
pub use stock::StockClient;

// ============================================================================
// WRITE STATUS
// ============================================================================

/// HTTP status returned by an upstream write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteStatus(pub u16);

impl WriteStatus {
    /// True for 2xx statuses.
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.0)
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for WriteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// SOURCE TRAITS
// ============================================================================

/// The catalog system of record.
///
/// Records are returned raw; field casing is not guaranteed.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// List every catalog record in catalog order.
    ///
    /// A transport failure or non-success status is an error.
    async fn list_all(&self) -> Result<Vec<Value>, UpstreamError>;

    /// Fetch a single record. A non-success status is `Ok(None)`.
    async fn get_by_id(&self, id: &str) -> Result<Option<Value>, UpstreamError>;

    /// Forward a create. Only transport failures are errors.
    async fn create(&self, product: &Product) -> Result<WriteStatus, UpstreamError>;

    /// Forward an update. Only transport failures are errors.
    async fn update(&self, id: &str, product: &Product) -> Result<WriteStatus, UpstreamError>;

    /// Forward a delete. Only transport failures are errors.
    async fn delete(&self, id: &str) -> Result<WriteStatus, UpstreamError>;
}

/// The stock-levels system.
#[async_trait]
pub trait StockSource: Send + Sync {
    /// Quantity on hand for `id`. A non-success status is `Ok(None)`.
    async fn get_stock(&self, id: &str) -> Result<Option<i64>, UpstreamError>;
}
