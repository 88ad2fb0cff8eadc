use async_trait::async_trait;
use weather_cache_core::{LocationQuery, WeatherConfig, WeatherDocument};

use crate::error::UpstreamError;

/// Longest slice of an error body carried into logs.
const LOG_BODY_PREVIEW: usize = 300;

/// Source of current-weather documents.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch the current weather for an already-normalized query.
    ///
    /// # Errors
    /// Returns an error on timeout, transport failure, non-success status or
    /// a body that is not JSON.
    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherDocument, UpstreamError>;
}

/// Client for the OpenWeatherMap current-weather endpoint.
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    units: String,
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("client", &self.client)
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("units", &self.units)
            .finish()
    }
}

impl OpenWeatherClient {
    /// Builds a client with the configured endpoint, key, units and timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(config: &WeatherConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| UpstreamError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            api_key: config.upstream_api_key.clone(),
            base_url: config.upstream_base_url.trim_end_matches('/').to_owned(),
            units: config.units.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherDocument, UpstreamError> {
        let q = query.to_provider_query();
        tracing::debug!(q = %q, "Fetching weather from upstream");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", q.as_str()), ("appid", self.api_key.as_str()), ("units", self.units.as_str())])
            .send()
            .await
            .map_err(|e| {
                let err = UpstreamError::from_reqwest(&e);
                tracing::warn!(q = %q, error = %err, "Upstream request failed");
                err
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| UpstreamError::from_reqwest(&e))?;

        if !status.is_success() {
            tracing::warn!(
                q = %q,
                status = status.as_u16(),
                body = %body.chars().take(LOG_BODY_PREVIEW).collect::<String>(),
                "Upstream returned error status"
            );
            return Err(UpstreamError::HttpStatus { status: status.as_u16(), body });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(q = %q, error = %e, "Upstream payload is not JSON");
            UpstreamError::InvalidPayload(e.to_string())
        })
    }
}
