//! Journey-planning endpoint HTTP client.

use serde::Serialize;
use tracing::debug;

use crate::domain::Itinerary;

use super::JourneyPlanner;
use super::error::JourneyError;

/// Default base URL for the journey endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// A validated origin/destination pair.
///
/// Serialises to the request body `{"from": .., "destination": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JourneyRequest {
    from: String,
    destination: String,
}

impl JourneyRequest {
    /// Create a request, rejecting blank locations.
    pub fn new(from: impl Into<String>, destination: impl Into<String>) -> Result<Self, JourneyError> {
        let from = from.into();
        let destination = destination.into();

        if from.trim().is_empty() || destination.trim().is_empty() {
            return Err(JourneyError::MissingLocation);
        }

        Ok(Self { from, destination })
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}

/// Configuration for the journey client.
#[derive(Debug, Clone)]
pub struct JourneyConfig {
    /// Base URL; requests go to `{base_url}/journey`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl JourneyConfig {
    /// Create a new config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Journey endpoint client.
///
/// One request per call, no retries.
#[derive(Debug, Clone)]
pub struct JourneyClient {
    http: reqwest::Client,
    url: String,
}

impl JourneyClient {
    /// Create a new journey client with the given configuration.
    pub fn new(config: JourneyConfig) -> Result<Self, JourneyError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: format!("{}/journey", config.base_url.trim_end_matches('/')),
        })
    }

    /// The full endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl JourneyPlanner for JourneyClient {
    async fn plan(&self, request: &JourneyRequest) -> Result<Itinerary, JourneyError> {
        debug!(from = request.from(), destination = request.destination(), "planning journey");

        // `.json` also sets Content-Type: application/json
        let response = self.http.post(&self.url).json(request).send().await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JourneyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str::<Itinerary>(&body).map_err(|e| JourneyError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
