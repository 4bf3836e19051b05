//! Shared HTTP plumbing for upstream clients.

use std::time::Duration;

use mosaic_core::{ConfigError, UpstreamError, UpstreamSystem};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::Value;

/// Per-request timeout used when none is configured.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// A base URL plus the client used to reach it.
#[derive(Clone)]
pub(crate) struct HttpUpstream {
    client: Client,
    base_url: Url,
    system: UpstreamSystem,
}

impl HttpUpstream {
    /// Build an upstream with its own connection pool.
    pub(crate) fn new(
        system: UpstreamSystem,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: format!("{}_client", system),
                value: format!("{:?}", timeout),
                reason: e.to_string(),
            })?;
        Self::with_client(system, client, base_url)
    }

    /// Build an upstream that shares an existing client.
    pub(crate) fn with_client(
        system: UpstreamSystem,
        client: Client,
        base_url: &str,
    ) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            field: format!("{}_base_url", system),
            value: base_url.to_string(),
            reason,
        };

        let base_url = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(invalid("expected an http(s) URL".to_string()));
        }

        Ok(Self {
            client,
            base_url,
            system,
        })
    }

    pub(crate) fn system(&self) -> UpstreamSystem {
        self.system
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.client.get(url)
    }

    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        self.client.post(url)
    }

    pub(crate) fn put(&self, url: Url) -> RequestBuilder {
        self.client.put(url)
    }

    pub(crate) fn delete(&self, url: Url) -> RequestBuilder {
        self.client.delete(url)
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request, mapping connection-level failures.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, UpstreamError> {
        request.send().await.map_err(|e| UpstreamError::Transport {
            system: self.system,
            reason: e.to_string(),
        })
    }

    /// Read a response body as JSON.
    pub(crate) async fn json(&self, response: Response) -> Result<Value, UpstreamError> {
        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::InvalidResponse {
                system: self.system,
                reason: format!("Failed to parse response: {}", e),
            })
    }
}

impl std::fmt::Debug for HttpUpstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUpstream")
            .field("system", &self.system)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
