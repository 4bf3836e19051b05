//! Cache TTL configuration.

use std::time::Duration;

/// Sliding window used when the configured value is missing or invalid.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Parse a TTL given in whole minutes.
///
/// Missing, unparsable, zero or negative values fall back to
/// [`DEFAULT_CACHE_TTL`] with a warning. Never fails.
pub fn cache_ttl_from_minutes(raw: Option<&str>) -> Duration {
    let Some(raw) = raw else {
        return DEFAULT_CACHE_TTL;
    };

    match raw.trim().parse::<i64>() {
        Ok(minutes) if minutes > 0 => Duration::from_secs((minutes as u64).saturating_mul(60)),
        Ok(minutes) => {
            tracing::warn!(
                value = minutes,
                default_minutes = DEFAULT_CACHE_TTL.as_secs() / 60,
                "Cache TTL must be positive, using default"
            );
            DEFAULT_CACHE_TTL
        }
        Err(e) => {
            tracing::warn!(
                value = %raw,
                error = %e,
                default_minutes = DEFAULT_CACHE_TTL.as_secs() / 60,
                "Cache TTL is not a whole number of minutes, using default"
            );
            DEFAULT_CACHE_TTL
        }
    }
}
