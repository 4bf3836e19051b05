//! Health Check Endpoints
//!
//! - /health/ping - Simple liveness check
//! - /health/live - Process alive check with version, uptime and cache counters
//!
//! Health endpoints are never gated.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use mosaic_storage::CacheStats;
use serde::{Deserialize, Serialize};

use crate::services::ProductOrchestrator;
use crate::state::AppState;

// ============================================================================
// TYPES
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDetails {
    pub version: String,
    pub uptime_seconds: u64,
    pub cache: CacheSummary,
}

/// Product list cache counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSummary {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub entries: u64,
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheSummary {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            entries: stats.entry_count,
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health/ping
pub async fn ping() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        details: None,
    };
    (StatusCode::OK, Json(response))
}

/// GET /health/live
pub async fn liveness(
    State(start_time): State<Instant>,
    State(orchestrator): State<Arc<ProductOrchestrator>>,
) -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        details: Some(HealthDetails {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: start_time.elapsed().as_secs(),
            cache: orchestrator.cache_stats().await.into(),
        }),
    };
    (StatusCode::OK, Json(response))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the health check router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/live", get(liveness))
}
