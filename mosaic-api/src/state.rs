//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use mosaic_storage::InMemoryCatalogCache;
use mosaic_upstream::{CatalogClient, StockClient};

use crate::config::GatewayConfig;
use crate::error::{ApiError, ApiResult};
use crate::middleware::IdempotencyGate;
use crate::services::ProductOrchestrator;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ProductOrchestrator>,
    /// Token gate applied to product writes.
    pub gate: IdempotencyGate,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(orchestrator: ProductOrchestrator, gate: IdempotencyGate) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            gate,
            start_time: Instant::now(),
        }
    }

    /// Wire HTTP upstream clients, the in-memory cache and a fresh gate.
    ///
    /// Both clients share one connection pool.
    pub fn from_config(config: &GatewayConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(|e| ApiError::internal_error(format!("Failed to build HTTP client: {}", e)))?;

        let catalog = CatalogClient::with_client(client.clone(), &config.catalog_base_url)?;
        let stock = StockClient::with_client(client, &config.stock_base_url)?;

        let orchestrator = ProductOrchestrator::new(
            Arc::new(catalog),
            Arc::new(stock),
            Arc::new(InMemoryCatalogCache::new()),
            config.cache_ttl,
        );

        Ok(Self::new(orchestrator, IdempotencyGate::new()))
    }
}

crate::impl_from_ref!(Arc<ProductOrchestrator>, orchestrator);
crate::impl_from_ref!(IdempotencyGate, gate);
crate::impl_from_ref!(Instant, start_time);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_defaults() -> ApiResult<()> {
        let state = AppState::from_config(&GatewayConfig::default())?;
        assert!(state.gate.is_empty());
        assert!(state.orchestrator.ledger().is_empty());
        Ok(())
    }

    #[test]
    fn test_from_config_rejects_bad_url() {
        let config = GatewayConfig {
            catalog_base_url: "not a url".to_string(),
            ..GatewayConfig::default()
        };
        let result = AppState::from_config(&config);
        assert!(matches!(result, Err(e) if e.code == crate::error::ErrorCode::InternalError));
    }
}
