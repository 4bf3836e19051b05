//! Product REST API Routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use mosaic_core::Product;

use crate::error::{ApiError, ApiResult};
use crate::extractors::IdempotencyToken;
use crate::services::ProductOrchestrator;
use crate::state::AppState;

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/products - List all products with stock levels
pub async fn list_products(
    State(orchestrator): State<Arc<ProductOrchestrator>>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = orchestrator.list_products().await?;
    Ok(Json(products))
}

/// GET /api/v1/products/:id - Get a product by id
pub async fn get_product(
    State(orchestrator): State<Arc<ProductOrchestrator>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    orchestrator
        .get_product(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::product_not_found(&id))
}

/// POST /api/v1/products - Create a product
pub async fn create_product(
    State(orchestrator): State<Arc<ProductOrchestrator>>,
    token: IdempotencyToken,
    Json(product): Json<Product>,
) -> ApiResult<impl IntoResponse> {
    if product.id.trim().is_empty() {
        return Err(ApiError::invalid_input("Product id is required"));
    }

    orchestrator.create_product(&product, token.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/v1/products/:id - Update a product
pub async fn update_product(
    State(orchestrator): State<Arc<ProductOrchestrator>>,
    Path(id): Path<String>,
    token: IdempotencyToken,
    Json(product): Json<Product>,
) -> ApiResult<StatusCode> {
    orchestrator.update_product(&id, &product, token.as_deref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/products/:id - Delete a product
pub async fn delete_product(
    State(orchestrator): State<Arc<ProductOrchestrator>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    orchestrator.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the product routes router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}
