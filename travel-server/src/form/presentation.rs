//! What the station list shows for each line segment.
//!
//! Derived fresh from the itinerary and the expansion set on every render;
//! nothing here is stored.

use crate::domain::{LineCode, LineSegment, SegmentId, Station};

use super::ExpansionSet;

/// Marker drawn beside the station where a segment is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMarker {
    /// First station of the whole journey
    JourneyStart,
    /// Boarding a line after an interchange
    LineEntry,
}

/// Marker drawn beside the station where a segment is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitMarker {
    /// Last station of the whole journey
    JourneyEnd,
    /// Leaving a line to change
    LineExit,
}

/// One segment as the station list draws it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPresentation<'a> {
    pub id: SegmentId,
    pub line: LineCode,
    pub entry: &'a Station,
    pub entry_marker: EntryMarker,
    pub exit: &'a Station,
    pub exit_marker: ExitMarker,
    /// Number of stops between entry and exit
    pub intermediate_count: usize,
    /// Whether the intermediate stops are shown
    pub expanded: bool,
    /// Intermediate stops; empty unless expanded
    pub visible_intermediate: &'a [Station],
    /// Whether a "change line" indicator follows this segment
    pub change_after: bool,
}

impl SegmentPresentation<'_> {
    /// Whether the segment has a collapsible list of stops at all.
    pub fn has_intermediate_stops(&self) -> bool {
        self.intermediate_count > 0
    }
}

/// Derive the presentation of every segment.
pub fn present<'a>(
    segments: &[LineSegment<'a>],
    expanded: &ExpansionSet,
) -> Vec<SegmentPresentation<'a>> {
    let last = segments.len().saturating_sub(1);

    segments
        .iter()
        .enumerate()
        .map(|(position, seg)| {
            let id = SegmentId::new(seg.line(), position);
            let is_expanded = expanded.contains(&id);

            SegmentPresentation {
                id,
                line: seg.line(),
                entry: seg.entry(),
                entry_marker: if position == 0 {
                    EntryMarker::JourneyStart
                } else {
                    EntryMarker::LineEntry
                },
                exit: seg.exit(),
                exit_marker: if position == last {
                    ExitMarker::JourneyEnd
                } else {
                    ExitMarker::LineExit
                },
                intermediate_count: seg.intermediate_count(),
                expanded: is_expanded,
                visible_intermediate: if is_expanded { seg.intermediate() } else { &[] },
                change_after: position < last,
            }
        })
        .collect()
}
