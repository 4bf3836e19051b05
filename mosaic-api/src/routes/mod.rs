//! REST API Routes
//!
//! - `/api/v1/products`: product reads and writes, writes behind the gate
//! - `/health`: liveness endpoints, never gated

pub mod health;
pub mod product;

use axum::{middleware, Router};

use crate::middleware::idempotency_gate;
use crate::state::AppState;

/// Create the complete API router.
pub fn create_api_router(state: AppState) -> Router {
    let products = product::create_router().layer(middleware::from_fn_with_state(
        state.gate.clone(),
        idempotency_gate,
    ));

    Router::new()
        .nest("/api/v1/products", products)
        .nest("/health", health::create_router())
        .with_state(state)
}
