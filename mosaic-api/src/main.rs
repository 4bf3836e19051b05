//! Mosaic API Server

use mosaic_api::{
    create_api_router,
    telemetry::{init_tracing, TelemetryConfig},
    ApiError, ApiResult, AppState, GatewayConfig,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let config = GatewayConfig::from_env();
    init_tracing(&TelemetryConfig::new(config.log_format))?;

    let addr = config.bind_addr()?;
    let state = AppState::from_config(&config)?;
    let app = create_api_router(state);

    tracing::info!(
        %addr,
        catalog = %config.catalog_base_url,
        stock = %config.stock_base_url,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Mosaic API listening"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
