//! Application state for the web layer.

use std::sync::Arc;

use crate::journey::{JourneyClient, JourneyPlanner};
use crate::places::{PlaceLookup, PlaceProvider, PlacesClient};

use super::session::{SessionConfig, SessionStore};

/// Shared application state.
///
/// Generic over the outbound services so the router can be exercised
/// against in-process fakes.
pub struct AppState<P = PlacesClient, J = JourneyClient> {
    /// Place lookup; inert until a provider is installed
    pub places: Arc<PlaceLookup<P>>,

    /// Journey endpoint client
    pub journey: Arc<J>,

    /// Live visitor sessions
    pub sessions: SessionStore,
}

impl<P, J> Clone for AppState<P, J> {
    fn clone(&self) -> Self {
        Self {
            places: self.places.clone(),
            journey: self.journey.clone(),
            sessions: self.sessions.clone(),
        }
    }
}

impl<P: PlaceProvider, J: JourneyPlanner> AppState<P, J> {
    /// Create a new app state.
    pub fn new(places: PlaceLookup<P>, journey: J, sessions: &SessionConfig) -> Self {
        Self {
            places: Arc::new(places),
            journey: Arc::new(journey),
            sessions: SessionStore::new(sessions),
        }
    }
}
