//! Places client error types.

/// Errors from the places lookup.
#[derive(Debug, thiserror::Error)]
pub enum PlacesError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success HTTP status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Service answered 200 but reported a failure status in the body
    #[error("places service status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        status: &'static str,
        message: Option<String>,
    },

    /// Response body could not be parsed
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// No provider handle (missing credential, or not initialised yet)
    #[error("places lookup is not configured")]
    NotConfigured,

    /// `init` was called on an already-initialised lookup
    #[error("places lookup is already initialised")]
    AlreadyInitialized,

    /// Credential could not be used to build a client
    #[error("invalid places configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PlacesError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error 503: unavailable");

        let err = PlacesError::Status {
            status: "REQUEST_DENIED",
            message: Some("bad key".into()),
        };
        assert_eq!(err.to_string(), "places service status REQUEST_DENIED: bad key");

        let err = PlacesError::Status {
            status: "NOT_FOUND",
            message: None,
        };
        assert_eq!(err.to_string(), "places service status NOT_FOUND");

        assert_eq!(
            PlacesError::NotConfigured.to_string(),
            "places lookup is not configured"
        );
    }
}
