//! Polygon adapter configuration.

use std::time::Duration;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

/// Polygon API credential.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    api_key: String,
}

impl ApiCredentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(api_key: String) -> Self {
        Self { api_key }
    }

    /// Get the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Configuration for the Polygon adapter.
#[derive(Debug, Clone)]
pub struct PolygonConfig {
    /// API credential.
    pub credentials: ApiCredentials,
    /// API host, without trailing path.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Price lookup retry policy.
    pub retry: RetryConfig,
}

impl PolygonConfig {
    /// Create a new configuration against the production host.
    #[must_use]
    pub fn new(credentials: ApiCredentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            retry: RetryConfig::default(),
        }
    }

    /// Set the API host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Fixed-delay retry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = PolygonConfig::new(ApiCredentials::new("key".to_string()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay, Duration::from_secs(1));
    }

    #[test]
    fn config_builders() {
        let config = PolygonConfig::new(ApiCredentials::new("key".to_string()))
            .with_base_url("http://localhost:9999")
            .with_timeout(Duration::from_secs(2))
            .with_retry(RetryConfig {
                max_attempts: 5,
                delay: Duration::from_millis(10),
            });
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.retry.max_attempts, 5);
    }

    #[test]
    fn credentials_debug_redacted() {
        let credentials = ApiCredentials::new("super-secret".to_string());
        let debug = format!("{credentials:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
        assert_eq!(credentials.api_key(), "super-secret");
    }
}
