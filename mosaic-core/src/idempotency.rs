//! Dedupe key types for write idempotency.
//!
//! A [`DedupeKey`] identifies one logical write attempt: the client token,
//! the operation (verb plus logical resource path) and a fingerprint of the
//! request payload. Identical keys must describe identical writes, so the
//! payload is canonicalised before hashing.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::MosaicResult;

// ============================================================================
// OPERATION IDENTITY
// ============================================================================

/// HTTP verb plus logical resource path, e.g. `POST/products`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationIdentity(String);

impl OperationIdentity {
    /// Build an identity from a verb and a path.
    ///
    /// The verb is upper-cased and trailing slashes are dropped from the path.
    pub fn new(method: &str, path: &str) -> Self {
        let path = path.trim_end_matches('/');
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Self(format!("{}{}", method.to_ascii_uppercase(), path))
    }

    /// Identity for creating a product.
    pub fn create_product() -> Self {
        Self::new("POST", "/products")
    }

    /// Identity for updating the product with the given id.
    ///
    /// The id is appended verbatim so ids differing only by a trailing slash
    /// stay distinct.
    pub fn update_product(id: &str) -> Self {
        Self(format!("PUT/products/{}", id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// PAYLOAD FINGERPRINT
// ============================================================================

/// Lowercase hex SHA-256 of a canonically serialised payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PayloadFingerprint(String);

impl PayloadFingerprint {
    /// Fingerprint any serialisable payload.
    ///
    /// The payload is converted to a JSON tree, object keys are sorted
    /// recursively and the result is encoded compactly before hashing.
    pub fn of<T: Serialize + ?Sized>(payload: &T) -> MosaicResult<Self> {
        let canonical = canonicalize(serde_json::to_value(payload)?);
        let bytes = serde_json::to_vec(&canonical)?;
        Ok(Self::from_canonical_bytes(&bytes))
    }

    /// Fingerprint bytes that are already in canonical form.
    pub fn from_canonical_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PayloadFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rebuild a JSON tree with every object's keys in sorted order.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key, canonicalize(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

// ============================================================================
// DEDUPE KEY
// ============================================================================

/// Composite key claimed in the idempotency ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupeKey {
    pub client_token: String,
    pub operation: OperationIdentity,
    pub fingerprint: PayloadFingerprint,
}

impl DedupeKey {
    /// Assemble a key, fingerprinting the payload.
    ///
    /// A missing token contributes an empty component, so token-less
    /// retries of the same payload still collapse to one key.
    pub fn for_payload<T: Serialize + ?Sized>(
        client_token: Option<&str>,
        operation: OperationIdentity,
        payload: &T,
    ) -> MosaicResult<Self> {
        Ok(Self {
            client_token: client_token.unwrap_or_default().to_string(),
            operation,
            fingerprint: PayloadFingerprint::of(payload)?,
        })
    }
}

impl fmt::Display for DedupeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.client_token, self.operation, self.fingerprint)
    }
}
