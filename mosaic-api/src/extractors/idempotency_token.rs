//! Idempotency token extractor.
//!
//! Reads the `Idempotency-Key` header. A missing or blank header is
//! `IdempotencyToken(None)`; any other value is kept exactly as sent.
//! Bytes that are not valid UTF-8 are replaced, never rejected.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

/// Header carrying the client's idempotency token.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Client-supplied idempotency token, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyToken(pub Option<String>);

impl IdempotencyToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for IdempotencyToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(IdempotencyToken(token_from_headers(&parts.headers)))
    }
}

/// Raw token from the headers; blank counts as absent.
pub(crate) fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(IDEMPOTENCY_KEY_HEADER)?;
    let raw = String::from_utf8_lossy(value.as_bytes());
    (!raw.trim().is_empty()).then(|| raw.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: Option<HeaderValue>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert(IDEMPOTENCY_KEY_HEADER, value);
        }
        headers
    }

    #[test]
    fn test_token_present() {
        let token = token_from_headers(&headers(Some(HeaderValue::from_static("abc-1"))));
        assert_eq!(token.as_deref(), Some("abc-1"));
    }

    #[test]
    fn test_token_keeps_surrounding_whitespace() {
        let token = token_from_headers(&headers(Some(HeaderValue::from_static(" a "))));
        assert_eq!(token.as_deref(), Some(" a "));
    }

    #[test]
    fn test_token_missing_or_blank() {
        assert_eq!(token_from_headers(&headers(None)), None);
        assert_eq!(
            token_from_headers(&headers(Some(HeaderValue::from_static("   ")))),
            None
        );
    }

    #[test]
    fn test_token_with_opaque_bytes_is_accepted() {
        let value = HeaderValue::from_bytes(b"caf\xe9").expect("opaque bytes are a valid header");
        let token = token_from_headers(&headers(Some(value)));
        assert_eq!(token.as_deref(), Some("caf\u{FFFD}"));
    }
}
