//! Custom extractors for Axum handlers.

pub mod idempotency_token;

pub use idempotency_token::{IdempotencyToken, IDEMPOTENCY_KEY_HEADER};
