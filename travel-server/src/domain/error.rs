//! Domain error types.
//!
//! These errors represent validation failures in data received from the
//! journey endpoint. They are distinct from API/IO errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A distance component was negative or not a number
    #[error("invalid distance: {0} must be a non-negative number")]
    InvalidDistance(&'static str),

    /// A station code was malformed
    #[error(transparent)]
    InvalidStationCode(#[from] super::InvalidStationCode),
}
