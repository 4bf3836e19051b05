//! Mosaic Core - Gateway Data Types
//!
//! Pure data structures shared by every other crate in the workspace:
//! the client-facing [`Product`], the [`FieldNormalizer`] used to read
//! loosely typed upstream records, the dedupe key types for write
//! idempotency, and the error taxonomy.
//!
//! This crate performs no I/O.

pub mod error;
pub mod idempotency;
pub mod normalize;
pub mod product;

pub use error::{ConfigError, MosaicError, MosaicResult, UpstreamError, UpstreamSystem};
pub use idempotency::{DedupeKey, OperationIdentity, PayloadFingerprint};
pub use normalize::{FieldNormalizer, JsonRecord, Scalar};
pub use product::Product;
