//! Place lookup for the location inputs.
//!
//! Turns what the user types into ranked place candidates, and a chosen
//! candidate into a formatted address that can be sent to the journey
//! endpoint.
//!
//! Key characteristics:
//! - The provider handle is created once, at start-up, and only when a
//!   credential is configured. Until then every lookup degrades to an empty
//!   result instead of failing.
//! - Prediction failures are logged and swallowed; the user simply sees no
//!   suggestions and can keep typing.
//! - Resolution failures are returned so the form can tell the user.

mod client;
mod error;
mod types;

use std::sync::OnceLock;

use tracing::warn;

pub use client::{DEFAULT_BASE_URL, DEFAULT_COUNTRY, PlacesClient, PlacesConfig};
pub use error::PlacesError;
pub use types::{PlaceDetails, PlacePrediction, PlacesStatus, StructuredFormatting};

/// Trait for querying a places service.
///
/// This abstraction allows the form to be tested with mock data.
pub trait PlaceProvider {
    /// Ranked candidates for a partial query.
    fn autocomplete(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<PlacePrediction>, PlacesError>> + Send;

    /// Details for one candidate.
    fn details(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<PlaceDetails, PlacesError>> + Send;
}

/// Soft-failing wrapper around a lazily-installed [`PlaceProvider`].
pub struct PlaceLookup<P = PlacesClient> {
    provider: OnceLock<P>,
}

impl<P: PlaceProvider> PlaceLookup<P> {
    /// Create a lookup with no provider installed yet.
    pub fn new() -> Self {
        Self {
            provider: OnceLock::new(),
        }
    }

    /// Install the provider handle.
    ///
    /// Only the first call takes effect; later calls return
    /// [`PlacesError::AlreadyInitialized`] and leave the first handle in place.
    pub fn init(&self, provider: P) -> Result<(), PlacesError> {
        self.provider
            .set(provider)
            .map_err(|_| PlacesError::AlreadyInitialized)
    }

    /// Whether a provider has been installed.
    pub fn is_ready(&self) -> bool {
        self.provider.get().is_some()
    }

    /// Candidates for `query`.
    ///
    /// Never fails: a blank query, a missing provider or a provider error
    /// all yield an empty list.
    pub async fn predictions(&self, query: &str) -> Vec<PlacePrediction> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let Some(provider) = self.provider.get() else {
            return Vec::new();
        };

        match provider.autocomplete(query).await {
            Ok(predictions) => predictions,
            Err(e) => {
                warn!(query, error = %e, "error fetching predictions");
                Vec::new()
            }
        }
    }

    /// Resolve a chosen candidate to its formatted address.
    ///
    /// A place without a formatted address resolves to the empty string.
    pub async fn resolve(&self, prediction: &PlacePrediction) -> Result<String, PlacesError> {
        let provider = self.provider.get().ok_or(PlacesError::NotConfigured)?;

        let details = provider
            .details(&prediction.place_id)
            .await
            .inspect_err(|e| {
                warn!(place_id = %prediction.place_id, error = %e, "error fetching place details");
            })?;

        Ok(details.formatted_address.unwrap_or_default())
    }
}

impl<P: PlaceProvider> Default for PlaceLookup<P> {
    fn default() -> Self {
        Self::new()
    }
}
