//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{Distance, Itinerary, LineCode, LineInfo, Preferences, Station};
use crate::form::{
    EntryMarker, ExitMarker, Field, Notification, SegmentPresentation, TravelForm,
};
use crate::places::PlacePrediction;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page: the form, its predictions and the current itinerary.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub theme: &'static str,
    pub layout: &'static str,
    pub compact: bool,
    pub from: LocationView,
    pub to: LocationView,
    pub can_submit: bool,
    pub submit_label: &'static str,
    pub notifications: Vec<NotificationView>,
    pub itinerary: Option<ItineraryView>,
    pub legend: Vec<LegendEntry>,
}

impl IndexTemplate {
    /// Build the page for one session.
    ///
    /// Takes pending notifications out of the form, so each is shown once.
    pub fn for_session(form: &mut TravelForm, prefs: Preferences) -> Self {
        let notifications = form
            .take_notifications()
            .iter()
            .map(NotificationView::from_notification)
            .collect();

        let itinerary = form
            .result()
            .map(|result| ItineraryView::new(result, &form.presentation(), form.planned_at()));

        Self {
            theme: prefs.theme.as_str(),
            layout: prefs.layout.as_str(),
            compact: prefs.layout.is_compact(),
            from: LocationView::new(form, Field::From),
            to: LocationView::new(form, Field::To),
            can_submit: form.can_submit(),
            submit_label: if form.is_loading() {
                "Calculating..."
            } else {
                "Get Directions"
            },
            notifications,
            itinerary,
            legend: LegendEntry::all(),
        }
    }
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Prediction list for one location input.
#[derive(Template)]
#[template(path = "predictions.html")]
pub struct PredictionsTemplate {
    pub field: &'static str,
    pub predictions: Vec<PredictionView>,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// One location input.
#[derive(Debug, Clone)]
pub struct LocationView {
    pub field: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub query: String,
    pub resolved: bool,
    /// Empty unless this input's list is open
    pub predictions: Vec<PredictionView>,
}

impl LocationView {
    pub fn new(form: &TravelForm, field: Field) -> Self {
        let input = form.input(field);
        let (label, placeholder) = match field {
            Field::From => ("From", "Enter starting location"),
            Field::To => ("To", "Enter destination"),
        };

        Self {
            field: field.as_str(),
            label,
            placeholder,
            query: input.query().to_string(),
            resolved: input.resolved().is_some(),
            predictions: PredictionView::list(form.visible_predictions(field)),
        }
    }
}

/// One entry in a prediction list.
#[derive(Debug, Clone)]
pub struct PredictionView {
    pub place_id: String,
    pub main_text: String,
    pub secondary_text: String,
}

impl PredictionView {
    pub fn list(predictions: &[PlacePrediction]) -> Vec<Self> {
        predictions
            .iter()
            .map(|p| {
                let main_text = if p.structured_formatting.main_text.is_empty() {
                    p.description.clone()
                } else {
                    p.structured_formatting.main_text.clone()
                };
                Self {
                    place_id: p.place_id.clone(),
                    main_text,
                    secondary_text: p.structured_formatting.secondary_text.clone(),
                }
            })
            .collect()
    }
}

/// A toast.
#[derive(Debug, Clone)]
pub struct NotificationView {
    /// CSS modifier: `success` or `error`
    pub kind: &'static str,
    pub message: String,
}

impl NotificationView {
    pub fn from_notification(n: &Notification) -> Self {
        Self {
            kind: if n.is_error() { "error" } else { "success" },
            message: n.message.clone(),
        }
    }
}

/// Itinerary view model for templates.
#[derive(Debug, Clone)]
pub struct ItineraryView {
    pub walk_to_station: String,
    pub walk_from_station: String,
    pub total_walking: String,
    pub stops: String,
    pub changes: String,
    /// e.g. "14:05"
    pub planned_at: Option<String>,
    pub segments: Vec<SegmentView>,
}

impl ItineraryView {
    pub fn new(
        itinerary: &Itinerary,
        segments: &[SegmentPresentation<'_>],
        planned_at: Option<chrono::DateTime<chrono::Local>>,
    ) -> Self {
        Self {
            walk_to_station: walking_summary(&itinerary.walk_to_station),
            walk_from_station: walking_summary(&itinerary.walk_from_station),
            total_walking: walking_summary(&itinerary.total_walking),
            stops: format!("{} stops", itinerary.total_stops),
            changes: format!("{} changes", itinerary.total_interchanges),
            planned_at: planned_at.map(|t| t.format("%H:%M").to_string()),
            segments: segments.iter().map(SegmentView::from_presentation).collect(),
        }
    }
}

/// Format a walking leg, e.g. "1.25 km • 15 min".
pub fn walking_summary(distance: &Distance) -> String {
    format!(
        "{:.2} km • {} min",
        distance.kilometers(),
        distance.whole_minutes()
    )
}

/// Station view model.
#[derive(Debug, Clone)]
pub struct StationView {
    pub code: String,
    pub name: String,
}

impl StationView {
    pub fn from_station(station: &Station) -> Self {
        Self {
            code: station.code.as_str().to_string(),
            name: station.name.clone(),
        }
    }
}

/// One line segment of the station list.
#[derive(Debug, Clone)]
pub struct SegmentView {
    /// Segment id, e.g. "K-0"
    pub id: String,
    pub line_label: String,
    pub colour: &'static str,
    pub entry: StationView,
    /// `start` or `enter`
    pub entry_icon: &'static str,
    pub exit: StationView,
    /// `end` or `exit`
    pub exit_icon: &'static str,
    pub intermediate_count: usize,
    pub expanded: bool,
    pub intermediate: Vec<StationView>,
    pub change_after: bool,
}

impl SegmentView {
    pub fn from_presentation(seg: &SegmentPresentation<'_>) -> Self {
        let info = LineInfo::for_line(seg.line);

        Self {
            id: seg.id.to_string(),
            line_label: line_label(seg.line, &info),
            colour: info.colour,
            entry: StationView::from_station(seg.entry),
            entry_icon: match seg.entry_marker {
                EntryMarker::JourneyStart => "start",
                EntryMarker::LineEntry => "enter",
            },
            exit: StationView::from_station(seg.exit),
            exit_icon: match seg.exit_marker {
                ExitMarker::JourneyEnd => "end",
                ExitMarker::LineExit => "exit",
            },
            intermediate_count: seg.intermediate_count,
            expanded: seg.expanded,
            intermediate: seg
                .visible_intermediate
                .iter()
                .map(StationView::from_station)
                .collect(),
            change_after: seg.change_after,
        }
    }

    pub fn has_intermediate_stops(&self) -> bool {
        self.intermediate_count > 0
    }
}

fn line_label(line: LineCode, info: &LineInfo) -> String {
    match info.name {
        Some(name) => name.to_string(),
        None => format!("Line {line}"),
    }
}

/// Legend entry for a line colour.
#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub label: String,
    pub colour: &'static str,
}

impl LegendEntry {
    pub fn all() -> Vec<Self> {
        LineInfo::legend()
            .map(|(line, info)| {
                let name = line_label(line, &info);
                let label = match info.short {
                    Some(short) => format!("{name} ({short})"),
                    None => name,
                };
                Self {
                    label,
                    colour: info.colour,
                }
            })
            .collect()
    }
}
