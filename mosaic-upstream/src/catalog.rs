//! Catalog system client.

use std::time::Duration;

use async_trait::async_trait;
use mosaic_core::{ConfigError, Product, UpstreamError, UpstreamSystem};
use reqwest::Client;
use serde_json::Value;

use crate::http::HttpUpstream;
use crate::{CatalogSource, WriteStatus};

const PRODUCTS: &str = "products";

/// HTTP client for the catalog system.
///
/// Endpoints, relative to the base URL:
/// `GET /products`, `GET /products/{id}`, `POST /products`,
/// `PUT /products/{id}`, `DELETE /products/{id}`.
#[derive(Clone)]
pub struct CatalogClient {
    http: HttpUpstream,
}

impl CatalogClient {
    /// Create a catalog client with its own connection pool.
    ///
    /// # Arguments
    /// * `base_url` - Catalog service URL (e.g., "http://localhost:5001")
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            http: HttpUpstream::new(UpstreamSystem::Catalog, base_url, timeout)?,
        })
    }

    /// Create a catalog client sharing an existing `reqwest` client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            http: HttpUpstream::with_client(UpstreamSystem::Catalog, client, base_url)?,
        })
    }

    async fn write(
        &self,
        request: reqwest::RequestBuilder,
        action: &'static str,
    ) -> Result<WriteStatus, UpstreamError> {
        let response = self.http.send(request).await?;
        let status = WriteStatus(response.status().as_u16());
        tracing::debug!(system = %self.http.system(), action, %status, "Catalog write forwarded");
        Ok(status)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn list_all(&self) -> Result<Vec<Value>, UpstreamError> {
        let response = self.http.send(self.http.get(self.http.url(&[PRODUCTS]))).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                system: self.http.system(),
                status: status.as_u16(),
            });
        }

        match self.http.json(response).await? {
            Value::Array(records) => Ok(records),
            other => Err(UpstreamError::InvalidResponse {
                system: self.http.system(),
                reason: format!("expected a JSON array, got {}", json_kind(&other)),
            }),
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Value>, UpstreamError> {
        let response = self
            .http
            .send(self.http.get(self.http.url(&[PRODUCTS, id])))
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(product_id = %id, status = status.as_u16(), "Catalog record not found");
            return Ok(None);
        }

        self.http.json(response).await.map(Some)
    }

    async fn create(&self, product: &Product) -> Result<WriteStatus, UpstreamError> {
        let request = self.http.post(self.http.url(&[PRODUCTS])).json(product);
        self.write(request, "create").await
    }

    async fn update(&self, id: &str, product: &Product) -> Result<WriteStatus, UpstreamError> {
        let request = self.http.put(self.http.url(&[PRODUCTS, id])).json(product);
        self.write(request, "update").await
    }

    async fn delete(&self, id: &str) -> Result<WriteStatus, UpstreamError> {
        let request = self.http.delete(self.http.url(&[PRODUCTS, id]));
        self.write(request, "delete").await
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.http.base_url().as_str())
            .finish()
    }
}
