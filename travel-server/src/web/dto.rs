//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::places::PlacePrediction;

/// Keystroke in a location input.
#[derive(Debug, Deserialize)]
pub struct QueryForm {
    /// Current text of the input
    #[serde(default)]
    pub q: String,
}

/// Choice of a prediction.
#[derive(Debug, Deserialize)]
pub struct SelectForm {
    pub place_id: String,
}

/// Predictions for a location input.
#[derive(Debug, Serialize)]
pub struct PredictionsResponse {
    pub predictions: Vec<PlacePrediction>,
}

/// Result of expanding or collapsing a segment.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// Segment id, e.g. "K-0"
    pub id: String,
    pub expanded: bool,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
