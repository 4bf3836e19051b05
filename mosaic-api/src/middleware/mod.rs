//! Middleware modules for the Mosaic API
//!
//! - `idempotency`: coarse token gate for product writes
//!
//! The gate wraps the product routes only; health endpoints are never gated.

pub mod idempotency;

pub use idempotency::{idempotency_gate, IdempotencyError, IdempotencyGate};
