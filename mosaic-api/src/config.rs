//! Gateway Configuration Module
//!
//! Configuration is loaded from environment variables with defaults suited
//! to local development. Nothing here aborts startup except a bind address
//! that cannot be parsed.

use std::net::SocketAddr;
use std::time::Duration;

use mosaic_storage::cache_ttl_from_minutes;
use mosaic_upstream::DEFAULT_UPSTREAM_TIMEOUT;

use crate::error::{ApiError, ApiResult};
use crate::telemetry::LogFormat;

/// Catalog base URL used when none is configured.
pub const DEFAULT_CATALOG_BASE_URL: &str = "http://localhost:5001";

/// Stock base URL used when none is configured.
pub const DEFAULT_STOCK_BASE_URL: &str = "http://localhost:5002";

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "3000";

// ============================================================================
// GATEWAY CONFIGURATION
// ============================================================================

/// Runtime configuration for the gateway process.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Catalog system base URL, trailing slashes trimmed.
    pub catalog_base_url: String,

    /// Stock system base URL, trailing slashes trimmed.
    pub stock_base_url: String,

    /// Sliding window of the product list cache.
    pub cache_ttl: Duration,

    /// Per-request timeout for upstream calls.
    pub upstream_timeout: Duration,

    /// Listen host.
    pub bind_host: String,

    /// Listen port, unparsed.
    pub port: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl GatewayConfig {
    /// Create GatewayConfig from environment variables.
    ///
    /// Environment variables:
    /// - `MOSAIC_CATALOG_BASE_URL`: Catalog base URL (default: http://localhost:5001)
    /// - `MOSAIC_STOCK_BASE_URL`: Stock base URL (default: http://localhost:5002)
    /// - `MOSAIC_CACHE_TTL_MINUTES`: Sliding cache window in minutes (default: 5)
    /// - `MOSAIC_UPSTREAM_TIMEOUT_SECS`: Upstream request timeout (default: 30)
    /// - `MOSAIC_API_BIND`: Listen host (default: 0.0.0.0)
    /// - `PORT` or `MOSAIC_API_PORT`: Listen port (default: 3000)
    /// - `MOSAIC_LOG_FORMAT`: "json" or "pretty" (default: pretty)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = |key: &str, default: &str| {
            lookup(key)
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let upstream_timeout = lookup("MOSAIC_UPSTREAM_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT);

        Self {
            catalog_base_url: base_url("MOSAIC_CATALOG_BASE_URL", DEFAULT_CATALOG_BASE_URL),
            stock_base_url: base_url("MOSAIC_STOCK_BASE_URL", DEFAULT_STOCK_BASE_URL),
            cache_ttl: cache_ttl_from_minutes(lookup("MOSAIC_CACHE_TTL_MINUTES").as_deref()),
            upstream_timeout,
            bind_host: lookup("MOSAIC_API_BIND").unwrap_or_else(|| DEFAULT_BIND_HOST.to_string()),
            port: lookup("PORT")
                .or_else(|| lookup("MOSAIC_API_PORT"))
                .unwrap_or_else(|| DEFAULT_PORT.to_string()),
            log_format: lookup("MOSAIC_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or_default(),
        }
    }

    /// Resolve the listen address.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let port = self.port.trim().parse::<u16>().map_err(|_| {
            ApiError::invalid_input(format!("Invalid port value: {}", self.port))
        })?;

        let addr = format!("{}:{}", self.bind_host, port);
        addr.parse::<SocketAddr>().map_err(|e| {
            ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e))
        })
    }
}
