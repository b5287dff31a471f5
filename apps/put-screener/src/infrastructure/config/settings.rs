//! Screener Configuration Settings
//!
//! Configuration types for the screener service, loaded from environment
//! variables (after `.env` has been applied by the binary).

use std::time::Duration;

use crate::application::services::{DEFAULT_SNAPSHOT_CONCURRENCY, SnapshotStrategy};
use crate::application::use_cases::RetrievePutsConfig;
use crate::infrastructure::polygon::{ApiCredentials, DEFAULT_BASE_URL, PolygonConfig, RetryConfig};

const API_KEY_VAR: &str = "POLYGON_API_KEY";
const LEGACY_API_KEY_VAR: &str = "API_KEY";

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Listen port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 5000 }
    }
}

/// Complete screener configuration.
#[derive(Debug, Clone)]
pub struct ScreenerConfig {
    /// Provider settings.
    pub polygon: PolygonConfig,
    /// Pipeline tuning.
    pub pipeline: RetrievePutsConfig,
    /// HTTP server settings.
    pub server: ServerSettings,
}

impl ScreenerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or empty, or a numeric
    /// setting fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (key_var, api_key) = lookup(API_KEY_VAR)
            .map(|v| (API_KEY_VAR, v))
            .or_else(|| lookup(LEGACY_API_KEY_VAR).map(|v| (LEGACY_API_KEY_VAR, v)))
            .ok_or_else(|| ConfigError::MissingEnvVar(API_KEY_VAR.to_string()))?;

        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(ConfigError::EmptyValue(key_var.to_string()));
        }

        let base_url = lookup("POLYGON_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let retry_defaults = RetryConfig::default();
        let retry = RetryConfig {
            max_attempts: parse_env(
                &lookup,
                "SCREENER_PRICE_MAX_ATTEMPTS",
                retry_defaults.max_attempts,
            )?,
            delay: parse_env_duration_millis(
                &lookup,
                "SCREENER_PRICE_RETRY_DELAY_MS",
                retry_defaults.delay,
            )?,
        };

        let polygon = PolygonConfig::new(ApiCredentials::new(api_key))
            .with_base_url(base_url)
            .with_timeout(parse_env_duration_secs(
                &lookup,
                "SCREENER_REQUEST_TIMEOUT_SECS",
                Duration::from_secs(10),
            )?)
            .with_retry(retry);

        let pipeline_defaults = RetrievePutsConfig::default();
        let strategy = lookup("SCREENER_SNAPSHOT_MODE")
            .map(|s| SnapshotStrategy::from_str_case_insensitive(&s))
            .unwrap_or_default();
        let pipeline = RetrievePutsConfig {
            page_limit: parse_env(
                &lookup,
                "SCREENER_CONTRACTS_PAGE_LIMIT",
                pipeline_defaults.page_limit,
            )?,
            strategy,
            concurrency: parse_env(
                &lookup,
                "SCREENER_SNAPSHOT_CONCURRENCY",
                DEFAULT_SNAPSHOT_CONCURRENCY,
            )?
            .max(1),
        };

        let server = ServerSettings {
            port: parse_env(&lookup, "SCREENER_HTTP_PORT", ServerSettings::default().port)?,
        };

        Ok(Self {
            polygon,
            pipeline,
            server,
        })
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Environment variable could not be parsed.
    #[error("environment variable {key} has invalid value {value:?}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Raw value.
        value: String,
    },
}

fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}

fn parse_env_duration_secs<F>(
    lookup: &F,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    parse_env(lookup, key, default.as_secs()).map(Duration::from_secs)
}

fn parse_env_duration_millis<F>(
    lookup: &F,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_env(lookup, key, default_ms).map(Duration::from_millis)
}
