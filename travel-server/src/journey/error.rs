//! Journey client error types.

/// Errors from planning a journey.
#[derive(Debug, thiserror::Error)]
pub enum JourneyError {
    /// Origin or destination was blank; nothing was sent
    #[error("both a starting point and a destination are required")]
    MissingLocation,

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not a valid itinerary
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },
}
