//! Stock system client.

use std::time::Duration;

use async_trait::async_trait;
use mosaic_core::{ConfigError, FieldNormalizer, UpstreamError, UpstreamSystem};
use reqwest::Client;

use crate::http::HttpUpstream;
use crate::StockSource;

/// HTTP client for the stock system: `GET /stock/{id}` answering
/// `{"stock": <integer>}`.
#[derive(Clone)]
pub struct StockClient {
    http: HttpUpstream,
}

impl StockClient {
    /// Create a stock client with its own connection pool.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            http: HttpUpstream::new(UpstreamSystem::Stock, base_url, timeout)?,
        })
    }

    /// Create a stock client sharing an existing `reqwest` client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            http: HttpUpstream::with_client(UpstreamSystem::Stock, client, base_url)?,
        })
    }
}

#[async_trait]
impl StockSource for StockClient {
    async fn get_stock(&self, id: &str) -> Result<Option<i64>, UpstreamError> {
        let response = self
            .http
            .send(self.http.get(self.http.url(&["stock", id])))
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(product_id = %id, status = status.as_u16(), "No stock record");
            return Ok(None);
        }

        let body = self.http.json(response).await?;
        match FieldNormalizer::integer(&body, "stock") {
            Some(stock) => Ok(Some(stock)),
            None => Err(UpstreamError::InvalidResponse {
                system: self.http.system(),
                reason: format!("missing integer 'stock' field for product {}", id),
            }),
        }
    }
}

impl std::fmt::Debug for StockClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockClient")
            .field("base_url", &self.http.base_url().as_str())
            .finish()
    }
}
