//! Product Orchestrator
//!
//! Composes the catalog and stock systems into a single product view and
//! guards the write path against duplicate submissions.
//!
//! Read path (`list_products`) is cache-aside: a hit returns the cached
//! list verbatim, a miss lists the catalog, looks up stock for every
//! identified record concurrently, and stores the merged list. Stock
//! failures degrade that product to zero stock; catalog failures abort
//! and leave the cache untouched.
//!
//! Write path (`create_product`, `update_product`) claims a
//! [`DedupeKey`] in the [`IdempotencyLedger`] before forwarding. The claim
//! is recorded before the upstream call, so a failed forward still leaves
//! the key claimed.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use mosaic_core::{DedupeKey, OperationIdentity, Product};
use mosaic_storage::{CacheStats, IdempotencyLedger, ProductCatalogCache};
use mosaic_upstream::{CatalogSource, StockSource, WriteStatus};
use serde_json::Value;

use crate::error::ApiResult;

// ============================================================================
// WRITE OUTCOME
// ============================================================================

/// What happened to a write request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The write reached the catalog, which answered with `status`.
    Forwarded { status: WriteStatus },
    /// An identical write was already claimed; nothing was sent.
    AlreadyHandled,
}

impl WriteOutcome {
    pub fn is_forwarded(&self) -> bool {
        matches!(self, WriteOutcome::Forwarded { .. })
    }
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

/// Merges catalog and stock data and deduplicates writes.
#[derive(Clone)]
pub struct ProductOrchestrator {
    catalog: Arc<dyn CatalogSource>,
    stock: Arc<dyn StockSource>,
    cache: Arc<dyn ProductCatalogCache>,
    ledger: IdempotencyLedger,
    cache_ttl: Duration,
}

impl ProductOrchestrator {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        stock: Arc<dyn StockSource>,
        cache: Arc<dyn ProductCatalogCache>,
        cache_ttl: Duration,
    ) -> Self {
        Self::with_ledger(catalog, stock, cache, IdempotencyLedger::new(), cache_ttl)
    }

    /// Create an orchestrator sharing an existing ledger.
    pub fn with_ledger(
        catalog: Arc<dyn CatalogSource>,
        stock: Arc<dyn StockSource>,
        cache: Arc<dyn ProductCatalogCache>,
        ledger: IdempotencyLedger,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            catalog,
            stock,
            cache,
            ledger,
            cache_ttl,
        }
    }

    pub fn ledger(&self) -> &IdempotencyLedger {
        &self.ledger
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    // ========================================================================
    // Read path
    // ========================================================================

    /// List every product, merged with its stock level.
    pub async fn list_products(&self) -> ApiResult<Vec<Product>> {
        if let Some(products) = self.cache.get().await {
            tracing::debug!(count = products.len(), "Product list cache hit");
            return Ok(products);
        }
        tracing::debug!("Product list cache miss");

        let records = self.catalog.list_all().await?;
        let identified: Vec<(String, &Value)> = records
            .iter()
            .enumerate()
            .filter_map(|(position, record)| match Product::catalog_id(record) {
                Some(id) => Some((id, record)),
                None => {
                    tracing::warn!(position, "Skipping catalog record without an id");
                    None
                }
            })
            .collect();

        let levels = join_all(identified.iter().map(|(id, _)| self.stock_level(id))).await;

        let products: Vec<Product> = identified
            .into_iter()
            .zip(levels)
            .map(|((id, record), stock)| Product::with_identity(id, record, stock))
            .collect();

        self.cache.set(products.clone(), self.cache_ttl).await;
        tracing::debug!(count = products.len(), "Product list merged and cached");
        Ok(products)
    }

    /// Fetch one product. `None` when the catalog has no record for `id`.
    ///
    /// Never reads or writes the list cache.
    pub async fn get_product(&self, id: &str) -> ApiResult<Option<Product>> {
        let Some(record) = self.catalog.get_by_id(id).await? else {
            return Ok(None);
        };

        let stock = self.stock_level(id).await;
        Ok(Some(Product::with_identity(id, &record, stock)))
    }

    /// Stock for `id`, or zero when the stock system cannot answer.
    async fn stock_level(&self, id: &str) -> i64 {
        match self.stock.get_stock(id).await {
            Ok(Some(level)) => level,
            Ok(None) => {
                tracing::warn!(product_id = %id, "No stock level, defaulting to 0");
                0
            }
            Err(e) => {
                tracing::warn!(
                    product_id = %id,
                    error = %e,
                    "Stock lookup failed, defaulting to 0"
                );
                0
            }
        }
    }

    // ========================================================================
    // Write path
    // ========================================================================

    /// Forward a create unless an identical one was already claimed.
    pub async fn create_product(
        &self,
        product: &Product,
        token: Option<&str>,
    ) -> ApiResult<WriteOutcome> {
        let key = DedupeKey::for_payload(token, OperationIdentity::create_product(), product)?;
        if !self.claim(key, &product.id) {
            return Ok(WriteOutcome::AlreadyHandled);
        }

        let status = self.catalog.create(product).await?;
        Ok(forwarded("create", &product.id, status))
    }

    /// Forward an update unless an identical one was already claimed.
    pub async fn update_product(
        &self,
        id: &str,
        product: &Product,
        token: Option<&str>,
    ) -> ApiResult<WriteOutcome> {
        let key = DedupeKey::for_payload(token, OperationIdentity::update_product(id), product)?;
        if !self.claim(key, id) {
            return Ok(WriteOutcome::AlreadyHandled);
        }

        let status = self.catalog.update(id, product).await?;
        Ok(forwarded("update", id, status))
    }

    /// Forward a delete. Deletes are never deduplicated.
    pub async fn delete_product(&self, id: &str) -> ApiResult<WriteOutcome> {
        let status = self.catalog.delete(id).await?;
        Ok(forwarded("delete", id, status))
    }

    fn claim(&self, key: DedupeKey, product_id: &str) -> bool {
        let operation = key.operation.clone();
        let claimed = self.ledger.claim(key).is_claimed();
        if !claimed {
            tracing::info!(
                product_id = %product_id,
                operation = %operation,
                "Duplicate write already handled, skipping upstream call"
            );
        }
        claimed
    }
}

fn forwarded(action: &'static str, product_id: &str, status: WriteStatus) -> WriteOutcome {
    if !status.is_success() {
        tracing::warn!(
            action,
            product_id = %product_id,
            status = %status,
            "Catalog rejected write"
        );
    }
    WriteOutcome::Forwarded { status }
}

impl std::fmt::Debug for ProductOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductOrchestrator")
            .field("ledger_claims", &self.ledger.len())
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}
