//! Domain types for the travel planner.
//!
//! This module contains the itinerary model received from the journey
//! endpoint and the line segmentation derived from it. Types enforce their
//! invariants at construction time, so code that receives them can trust
//! their validity.

mod error;
mod itinerary;
mod line;
mod prefs;
mod segment;
mod station;

pub use error::DomainError;
pub use itinerary::{Distance, Itinerary};
pub use line::{DEFAULT_LINE_COLOUR, LineInfo};
pub use prefs::{Layout, Preferences, Theme};
pub use segment::{InvalidSegmentId, LineSegment, SegmentId, segment};
pub use station::{InvalidStationCode, LineCode, Station, StationCode};
