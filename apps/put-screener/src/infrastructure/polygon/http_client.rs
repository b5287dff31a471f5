//! HTTP client wrapper for the Polygon API.
//!
//! The credential travels as the `apiKey` query parameter. Continuation URLs
//! returned by the provider are followed verbatim, with `apiKey` appended
//! only when the URL does not already carry one.

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::api_types::PolygonErrorResponse;
use super::config::{ApiCredentials, PolygonConfig};
use super::error::PolygonError;

const API_KEY_PARAM: &str = "apiKey";

/// HTTP client for the Polygon API.
#[derive(Debug, Clone)]
pub struct PolygonHttpClient {
    client: Client,
    credentials: ApiCredentials,
    base_url: Url,
}

impl PolygonHttpClient {
    /// Create a new HTTP client from config.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty, the base URL is invalid or
    /// the underlying client cannot be built.
    pub fn new(config: &PolygonConfig) -> Result<Self, PolygonError> {
        if config.credentials.api_key().is_empty() {
            return Err(PolygonError::AuthenticationFailed);
        }

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| PolygonError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(PolygonError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PolygonError::Network(e.to_string()))?;

        Ok(Self {
            client,
            credentials: config.credentials.clone(),
            base_url,
        })
    }

    /// Build an endpoint URL from path segments, each percent-encoded as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, PolygonError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| PolygonError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET an endpoint with query parameters.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status or an
    /// undecodable body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, PolygonError> {
        let mut url = self.endpoint(segments)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        self.send(self.with_credential(url)).await
    }

    /// GET a provider-supplied continuation URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed, plus every error of [`Self::get`].
    pub async fn get_next<T: DeserializeOwned>(&self, next_url: &str) -> Result<T, PolygonError> {
        let url = Url::parse(next_url).map_err(|e| PolygonError::InvalidUrl(e.to_string()))?;
        self.send(self.with_credential(url)).await
    }

    /// Append the credential unless the URL already carries one.
    #[must_use]
    pub fn with_credential(&self, mut url: Url) -> Url {
        let present = url.query_pairs().any(|(key, _)| key == API_KEY_PARAM);
        if !present {
            url.query_pairs_mut()
                .append_pair(API_KEY_PARAM, self.credentials.api_key());
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, url: Url) -> Result<T, PolygonError> {
        let path = url.path().to_string();
        tracing::debug!(path = %path, "Polygon request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PolygonError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PolygonError::Network(e.without_url().to_string()))?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| PolygonError::JsonParse(e.to_string()));
        }

        let message = serde_json::from_str::<PolygonErrorResponse>(&text)
            .ok()
            .and_then(PolygonErrorResponse::into_message)
            .unwrap_or(text);

        tracing::debug!(
            path = %path,
            status = status.as_u16(),
            message = %message,
            "Polygon error response"
        );
        Err(error_for_status(status, path, message))
    }
}

/// Map a non-success status to an adapter error.
fn error_for_status(status: StatusCode, path: String, message: String) -> PolygonError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PolygonError::AuthenticationFailed,
        StatusCode::NOT_FOUND => PolygonError::NotFound { resource: path },
        StatusCode::TOO_MANY_REQUESTS => PolygonError::RateLimited,
        _ => PolygonError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
