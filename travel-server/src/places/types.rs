//! Places web service response types.
//!
//! These mirror the JSON returned by the autocomplete and details endpoints.
//! Only the fields the planner uses are modelled; everything else is ignored.

use serde::{Deserialize, Serialize};

/// Main/secondary split of a prediction's text, e.g. "KLCC" / "Kuala Lumpur".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredFormatting {
    pub main_text: String,
    #[serde(default)]
    pub secondary_text: String,
}

/// A candidate place from the autocomplete endpoint.
///
/// Lives only until it is selected or the query changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacePrediction {
    /// Opaque identifier, used to fetch details
    pub place_id: String,
    /// Full one-line description
    pub description: String,
    /// Text split for display
    #[serde(default)]
    pub structured_formatting: StructuredFormatting,
}

/// Details for a selected place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Envelope status reported by the places service itself.
///
/// The service answers HTTP 200 even on failure; this is the real outcome.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacesStatus {
    Ok,
    ZeroResults,
    InvalidRequest,
    OverQueryLimit,
    RequestDenied,
    NotFound,
    UnknownError,
    #[serde(other)]
    Other,
}

impl PlacesStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacesStatus::Ok => "OK",
            PlacesStatus::ZeroResults => "ZERO_RESULTS",
            PlacesStatus::InvalidRequest => "INVALID_REQUEST",
            PlacesStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            PlacesStatus::RequestDenied => "REQUEST_DENIED",
            PlacesStatus::NotFound => "NOT_FOUND",
            PlacesStatus::UnknownError => "UNKNOWN_ERROR",
            PlacesStatus::Other => "OTHER",
        }
    }
}

/// Autocomplete endpoint response.
#[derive(Debug, Deserialize)]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub predictions: Vec<PlacePrediction>,
    pub status: PlacesStatus,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Details endpoint response.
#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    #[serde(default)]
    pub result: Option<PlaceDetails>,
    pub status: PlacesStatus,
    #[serde(default)]
    pub error_message: Option<String>,
}
