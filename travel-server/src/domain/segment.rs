//! Line segmentation of a station sequence.
//!
//! An itinerary arrives as a flat list of stations in travel order. For
//! display it is split into maximal runs of consecutive stations on the
//! same line; the boundary between two runs is an interchange.

use std::fmt;
use std::str::FromStr;

use super::{LineCode, Station};

/// A maximal run of consecutive stations on one line.
///
/// # Invariants
///
/// - At least one station
/// - Every station is on `line`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSegment<'a> {
    line: LineCode,
    stations: &'a [Station],
}

impl<'a> LineSegment<'a> {
    /// Returns the line of this segment.
    pub fn line(&self) -> LineCode {
        self.line
    }

    /// Returns the stations in travel order.
    pub fn stations(&self) -> &'a [Station] {
        self.stations
    }

    /// The station where this line is boarded.
    pub fn entry(&self) -> &'a Station {
        &self.stations[0]
    }

    /// The station where this line is left.
    pub fn exit(&self) -> &'a Station {
        &self.stations[self.stations.len() - 1]
    }

    /// Stations passed through between entry and exit.
    pub fn intermediate(&self) -> &'a [Station] {
        if self.stations.len() > 2 {
            &self.stations[1..self.stations.len() - 1]
        } else {
            &[]
        }
    }

    /// Number of intermediate stops (`len - 2`, or 0 for short segments).
    pub fn intermediate_count(&self) -> usize {
        self.stations.len().saturating_sub(2)
    }
}

/// Partition `stations` into maximal same-line segments, preserving order.
///
/// Concatenating the returned segments reproduces `stations` exactly, and no
/// two adjacent segments share a line. An empty input yields no segments.
///
/// # Examples
///
/// ```
/// use travel_server::domain::{Station, StationCode, segment};
///
/// let stations: Vec<Station> = ["KJ1", "KJ2", "SP1"]
///     .iter()
///     .map(|c| Station::new(StationCode::parse(c).unwrap(), *c))
///     .collect();
///
/// let segments = segment(&stations);
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].stations().len(), 2);
/// assert_eq!(segments[1].line().as_char(), 'S');
/// ```
pub fn segment(stations: &[Station]) -> Vec<LineSegment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;

    for i in 1..stations.len() {
        if stations[i].line() != stations[i - 1].line() {
            segments.push(LineSegment {
                line: stations[start].line(),
                stations: &stations[start..i],
            });
            start = i;
        }
    }

    // Flush the run still in progress
    if start < stations.len() {
        segments.push(LineSegment {
            line: stations[start].line(),
            stations: &stations[start..],
        });
    }

    segments
}

/// Identifies a segment within one itinerary: its line plus its position.
///
/// Positional, so only meaningful for the itinerary it was derived from.
/// Rendered as `K-0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId {
    pub line: LineCode,
    pub position: usize,
}

impl SegmentId {
    pub fn new(line: LineCode, position: usize) -> Self {
        Self { line, position }
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.line, self.position)
    }
}

/// Error returned when parsing an invalid segment identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid segment id: {0}")]
pub struct InvalidSegmentId(String);

impl FromStr for SegmentId {
    type Err = InvalidSegmentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidSegmentId(s.to_string());

        // The line character may itself be '-', so split on the last one
        let (line, position) = s.rsplit_once('-').ok_or_else(invalid)?;

        let mut chars = line.chars();
        let line = match (chars.next(), chars.next()) {
            (Some(c), None) => LineCode::new(c),
            _ => return Err(invalid()),
        };

        let position = position.parse().map_err(|_| invalid())?;

        Ok(SegmentId { line, position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationCode;

    fn station(code: &str) -> Station {
        Station::new(StationCode::parse(code).unwrap(), format!("Station {code}"))
    }

    fn stations(codes: &[&str]) -> Vec<Station> {
        codes.iter().map(|c| station(c)).collect()
    }

    #[test]
    fn empty_input_yields_no_segments() {
        assert!(segment(&[]).is_empty());
    }

    #[test]
    fn single_station_yields_one_segment() {
        let input = stations(&["K1"]);
        let segments = segment(&input);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].stations().len(), 1);
        assert_eq!(segments[0].line(), LineCode::new('K'));
        assert_eq!(segments[0].entry(), segments[0].exit());
        assert_eq!(segments[0].intermediate_count(), 0);
    }

    #[test]
    fn splits_on_line_change() {
        let input = stations(&["K1", "K2", "K3", "S1", "S2"]);
        let segments = segment(&input);

        assert_eq!(segments.len(), 2);

        assert_eq!(segments[0].line(), LineCode::new('K'));
        assert_eq!(segments[0].stations().len(), 3);
        assert_eq!(segments[0].intermediate_count(), 1);
        assert_eq!(segments[0].intermediate()[0].code.as_str(), "K2");

        assert_eq!(segments[1].line(), LineCode::new('S'));
        assert_eq!(segments[1].stations().len(), 2);
        assert_eq!(segments[1].intermediate_count(), 0);
        assert!(segments[1].intermediate().is_empty());
    }

    #[test]
    fn returning_to_a_line_starts_a_new_segment() {
        let input = stations(&["K1", "S1", "S2", "K2"]);
        let segments = segment(&input);

        let lines: Vec<char> = segments.iter().map(|s| s.line().as_char()).collect();
        assert_eq!(lines, vec!['K', 'S', 'K']);
    }

    #[test]
    fn entry_and_exit() {
        let input = stations(&["KJ10", "KJ11", "KJ12", "KJ13"]);
        let segments = segment(&input);

        assert_eq!(segments[0].entry().code.as_str(), "KJ10");
        assert_eq!(segments[0].exit().code.as_str(), "KJ13");
        assert_eq!(segments[0].intermediate_count(), 2);
    }

    #[test]
    fn segment_id_display_and_parse() {
        let id = SegmentId::new(LineCode::new('K'), 0);
        assert_eq!(id.to_string(), "K-0");
        assert_eq!("K-0".parse::<SegmentId>().unwrap(), id);
        assert_eq!(
            "S-12".parse::<SegmentId>().unwrap(),
            SegmentId::new(LineCode::new('S'), 12)
        );
        assert_eq!(
            "--3".parse::<SegmentId>().unwrap(),
            SegmentId::new(LineCode::new('-'), 3)
        );
    }

    #[test]
    fn segment_id_rejects_garbage() {
        assert!("".parse::<SegmentId>().is_err());
        assert!("K".parse::<SegmentId>().is_err());
        assert!("KJ-0".parse::<SegmentId>().is_err());
        assert!("K-x".parse::<SegmentId>().is_err());
        assert!("-0".parse::<SegmentId>().is_err());
    }
}
