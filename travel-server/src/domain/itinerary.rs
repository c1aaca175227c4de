//! Itinerary types returned by the journey-planning endpoint.

use serde::{Deserialize, Serialize};

use super::{DomainError, LineSegment, Station, segment};

/// A walking distance with its estimated duration.
///
/// Both components are finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDistance")]
pub struct Distance {
    kilometers: f64,
    minutes: f64,
}

#[derive(Deserialize)]
struct RawDistance {
    kilometers: f64,
    minutes: f64,
}

impl TryFrom<RawDistance> for Distance {
    type Error = DomainError;

    fn try_from(raw: RawDistance) -> Result<Self, Self::Error> {
        Distance::new(raw.kilometers, raw.minutes)
    }
}

impl Distance {
    /// Creates a distance, rejecting negative or non-finite components.
    pub fn new(kilometers: f64, minutes: f64) -> Result<Self, DomainError> {
        if !kilometers.is_finite() || kilometers < 0.0 {
            return Err(DomainError::InvalidDistance("kilometers"));
        }
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(DomainError::InvalidDistance("minutes"));
        }
        Ok(Self {
            kilometers,
            minutes,
        })
    }

    /// A zero distance.
    pub fn zero() -> Self {
        Self {
            kilometers: 0.0,
            minutes: 0.0,
        }
    }

    pub fn kilometers(&self) -> f64 {
        self.kilometers
    }

    pub fn minutes(&self) -> f64 {
        self.minutes
    }

    /// Minutes rounded to the nearest whole minute.
    pub fn whole_minutes(&self) -> u64 {
        self.minutes.round() as u64
    }
}

/// A planned journey: walking legs plus the ordered station sequence.
///
/// Received whole from the journey endpoint and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    /// Walk from the origin to the first station
    pub walk_to_station: Distance,
    /// Walk from the last station to the destination
    pub walk_from_station: Distance,
    /// Sum of both walks
    pub total_walking: Distance,
    /// Number of stations travelled through
    pub total_stops: u32,
    /// Number of line changes
    pub total_interchanges: u32,
    /// Stations in travel order
    pub stations: Vec<Station>,
}

impl Itinerary {
    /// Partition the station sequence into line segments.
    pub fn segments(&self) -> Vec<LineSegment<'_>> {
        segment(&self.stations)
    }

    /// Returns the first station, if any.
    pub fn first_station(&self) -> Option<&Station> {
        self.stations.first()
    }

    /// Returns the last station, if any.
    pub fn last_station(&self) -> Option<&Station> {
        self.stations.last()
    }
}
