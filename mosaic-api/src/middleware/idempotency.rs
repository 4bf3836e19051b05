//! Idempotency Gate Middleware for the Mosaic API
//!
//! Coarse first line of defense against retried writes. The gate looks only
//! at the raw `Idempotency-Key` header, not at the operation or the payload,
//! so two different writes sharing a token collide here even though the
//! orchestrator's ledger would treat them as distinct.
//!
//! # Behavior
//!
//! 1. Methods other than POST and PUT pass through
//! 2. A missing or blank token is logged and passes through
//! 3. An unseen token is claimed and the request proceeds
//! 4. A token seen before short-circuits with 409 Conflict
//!
//! Claims never expire.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware};
//! use mosaic_api::middleware::{idempotency_gate, IdempotencyGate};
//!
//! let gate = IdempotencyGate::new();
//!
//! let app = Router::new()
//!     .route("/api/v1/products", axum::routing::post(create_product))
//!     .layer(middleware::from_fn_with_state(gate, idempotency_gate));
//! ```

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use mosaic_storage::{ClaimOutcome, ClaimSet};

use crate::error::ApiError;
use crate::extractors::idempotency_token::token_from_headers;

// ============================================================================
// STATE
// ============================================================================

/// Process-wide set of tokens seen at the gate.
#[derive(Debug, Clone, Default)]
pub struct IdempotencyGate {
    claims: ClaimSet<String>,
}

impl IdempotencyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a request may proceed.
    pub fn admit(&self, method: &Method, token: Option<&str>) -> Result<(), IdempotencyError> {
        if !is_gated_method(method) {
            return Ok(());
        }

        let Some(token) = token else {
            tracing::debug!(%method, "No idempotency key on write, passing through");
            return Ok(());
        };

        match self.claims.try_claim(token.to_string()) {
            ClaimOutcome::Claimed => Ok(()),
            ClaimOutcome::AlreadyClaimed => {
                tracing::info!(
                    %method,
                    idempotency_key = %token,
                    "Duplicate request rejected at gate"
                );
                Err(IdempotencyError::Duplicate(token.to_string()))
            }
        }
    }

    /// Number of distinct tokens seen.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

// ============================================================================
// MIDDLEWARE
// ============================================================================

/// Axum middleware applying [`IdempotencyGate::admit`] before the handler.
pub async fn idempotency_gate(
    State(gate): State<IdempotencyGate>,
    request: Request,
    next: Next,
) -> Result<Response, IdempotencyError> {
    if is_gated_method(request.method()) {
        let token = token_from_headers(request.headers());
        gate.admit(request.method(), token.as_deref())?;
    }
    Ok(next.run(request).await)
}

/// Only creates and updates are gated.
fn is_gated_method(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT)
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Errors that can occur in the idempotency gate.
#[derive(Debug)]
pub enum IdempotencyError {
    /// Token was already used
    Duplicate(String),
}

impl IntoResponse for IdempotencyError {
    fn into_response(self) -> Response {
        match self {
            IdempotencyError::Duplicate(token) => {
                ApiError::duplicate_request(&token).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_is_gated_method() {
        assert!(is_gated_method(&Method::POST));
        assert!(is_gated_method(&Method::PUT));
        assert!(!is_gated_method(&Method::DELETE));
        assert!(!is_gated_method(&Method::PATCH));
        assert!(!is_gated_method(&Method::GET));
    }

    #[test]
    fn test_second_use_of_token_is_duplicate() {
        let gate = IdempotencyGate::new();
        assert!(gate.admit(&Method::POST, Some("t-1")).is_ok());
        assert!(matches!(
            gate.admit(&Method::POST, Some("t-1")),
            Err(IdempotencyError::Duplicate(token)) if token == "t-1"
        ));
        assert_eq!(gate.len(), 1);
    }

    #[test]
    fn test_token_collides_across_operations() {
        let gate = IdempotencyGate::new();
        assert!(gate.admit(&Method::POST, Some("shared")).is_ok());
        assert!(gate.admit(&Method::PUT, Some("shared")).is_err());
    }

    #[test]
    fn test_missing_token_passes_through() {
        let gate = IdempotencyGate::new();
        for _ in 0..3 {
            assert!(gate.admit(&Method::POST, None).is_ok());
        }
        assert!(gate.is_empty());
    }

    #[test]
    fn test_ungated_methods_do_not_claim() {
        let gate = IdempotencyGate::new();
        assert!(gate.admit(&Method::DELETE, Some("t")).is_ok());
        assert!(gate.admit(&Method::GET, Some("t")).is_ok());
        assert!(gate.is_empty());
        assert!(gate.admit(&Method::POST, Some("t")).is_ok());
    }

    #[test]
    fn test_token_is_claimed_as_sent() {
        let gate = IdempotencyGate::new();
        assert!(gate.admit(&Method::POST, Some(" a")).is_ok());
        assert!(gate.admit(&Method::POST, Some("a")).is_ok());
        assert!(gate.admit(&Method::POST, Some("a ")).is_ok());
        assert_eq!(gate.len(), 3);
    }

    #[test]
    fn test_gate_clones_share_claims() {
        let gate = IdempotencyGate::new();
        let clone = gate.clone();
        assert!(gate.admit(&Method::POST, Some("t")).is_ok());
        assert!(clone.admit(&Method::POST, Some("t")).is_err());
    }

    #[test]
    fn test_duplicate_response_is_conflict() {
        let response = IdempotencyError::Duplicate("t".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
