//! Mosaic API - Product Gateway
//!
//! Presents a unified product catalog over two backend systems: a catalog
//! of record and a stock-levels system. Reads are merged and cached;
//! writes are deduplicated twice, first by a coarse token gate at the
//! request boundary, then by a per-operation ledger keyed on token,
//! operation and payload fingerprint.
//!
//! All shared state is process-local.

pub mod config;
pub mod error;
pub mod extractors;
pub mod macros;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::GatewayConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use extractors::{IdempotencyToken, IDEMPOTENCY_KEY_HEADER};
pub use middleware::{idempotency_gate, IdempotencyError, IdempotencyGate};
pub use routes::create_api_router;
pub use services::{ProductOrchestrator, WriteOutcome};
pub use state::AppState;
