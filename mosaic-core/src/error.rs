//! Error types for mosaic operations

use std::fmt;
use thiserror::Error;

/// The two backend systems the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamSystem {
    /// Source of truth for product identity, name and description.
    Catalog,
    /// Source of truth for quantity on hand.
    Stock,
}

impl fmt::Display for UpstreamSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamSystem::Catalog => f.write_str("catalog"),
            UpstreamSystem::Stock => f.write_str("stock"),
        }
    }
}

/// Upstream communication errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Request to {system} failed: {reason}")]
    Transport {
        system: UpstreamSystem,
        reason: String,
    },

    #[error("{system} responded with status {status}")]
    Status { system: UpstreamSystem, status: u16 },

    #[error("Invalid response from {system}: {reason}")]
    InvalidResponse {
        system: UpstreamSystem,
        reason: String,
    },
}

impl UpstreamError {
    /// The system that produced this error.
    pub fn system(&self) -> UpstreamSystem {
        match self {
            UpstreamError::Transport { system, .. }
            | UpstreamError::Status { system, .. }
            | UpstreamError::InvalidResponse { system, .. } => *system,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all mosaic errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MosaicError {
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Payload serialization failed: {reason}")]
    Payload { reason: String },
}

impl From<serde_json::Error> for MosaicError {
    fn from(err: serde_json::Error) -> Self {
        MosaicError::Payload {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for mosaic operations.
pub type MosaicResult<T> = Result<T, MosaicError>;

// =============================================================================
// TESTS
// =============================================================================
