//! Journey-planning endpoint client.
//!
//! The remote endpoint takes two resolved addresses and returns an
//! [`Itinerary`](crate::domain::Itinerary). Routing and scheduling happen
//! entirely on the remote side.

mod client;
mod error;

pub use client::{DEFAULT_BASE_URL, JourneyClient, JourneyConfig, JourneyRequest};
pub use error::JourneyError;

use crate::domain::Itinerary;

/// Trait for planning a journey.
///
/// This abstraction allows the form to be tested without a live endpoint.
pub trait JourneyPlanner {
    /// Plan a journey for a validated request.
    fn plan(
        &self,
        request: &JourneyRequest,
    ) -> impl Future<Output = Result<Itinerary, JourneyError>> + Send;
}
