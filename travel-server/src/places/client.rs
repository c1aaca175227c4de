//! Places web service HTTP client.
//!
//! Queries the autocomplete and details endpoints of the places web
//! service. Predictions are restricted to one country and to the
//! "establishment" and "geocode" categories.

use serde::de::DeserializeOwned;
use tracing::debug;

use super::PlaceProvider;
use super::error::PlacesError;
use super::types::{
    AutocompleteResponse, DetailsResponse, PlaceDetails, PlacePrediction, PlacesStatus,
};

/// Default base URL for the places web service.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Default country restriction (ISO 3166-1 alpha-2).
pub const DEFAULT_COUNTRY: &str = "MY";

/// Place categories requested from the autocomplete endpoint.
const PREDICTION_TYPES: &str = "establishment|geocode";

/// Fields requested from the details endpoint.
const DETAIL_FIELDS: &str = "formatted_address,name";

/// Configuration for the places client.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the service
    pub base_url: String,
    /// Country predictions are restricted to
    pub country: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PlacesConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Restrict predictions to another country.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Places web service client.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    components: String,
}

impl PlacesClient {
    /// Create a new places client with the given configuration.
    pub fn new(config: PlacesConfig) -> Result<Self, PlacesError> {
        if config.api_key.trim().is_empty() {
            return Err(PlacesError::InvalidConfig("API key is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            components: format!("country:{}", config.country.to_lowercase()),
        })
    }

    /// GET an endpoint and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, PlacesError> {
        let url = format!("{}/{}/json", self.base_url, endpoint);

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlacesError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| PlacesError::Json {
            message: e.to_string(),
        })
    }
}

impl PlaceProvider for PlacesClient {
    async fn autocomplete(&self, query: &str) -> Result<Vec<PlacePrediction>, PlacesError> {
        let response: AutocompleteResponse = self
            .get_json(
                "autocomplete",
                &[
                    ("input", query),
                    ("components", self.components.as_str()),
                    ("types", PREDICTION_TYPES),
                ],
            )
            .await?;

        match response.status {
            PlacesStatus::Ok => {
                debug!(query, count = response.predictions.len(), "autocomplete");
                Ok(response.predictions)
            }
            PlacesStatus::ZeroResults => Ok(Vec::new()),
            status => Err(PlacesError::Status {
                status: status.as_str(),
                message: response.error_message,
            }),
        }
    }

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let response: DetailsResponse = self
            .get_json(
                "details",
                &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
            )
            .await?;

        match (response.status, response.result) {
            (PlacesStatus::Ok, Some(result)) => Ok(result),
            (PlacesStatus::Ok, None) => Err(PlacesError::Status {
                status: PlacesStatus::NotFound.as_str(),
                message: Some("details response had no result".to_string()),
            }),
            (status, _) => Err(PlacesError::Status {
                status: status.as_str(),
                message: response.error_message,
            }),
        }
    }
}
