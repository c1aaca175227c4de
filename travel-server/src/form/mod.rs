//! The travel form controller.
//!
//! `TravelForm` owns all state behind one visitor's form: what is typed in
//! each location field, the predictions on offer, the resolved addresses,
//! the submission lifecycle, the last itinerary and which of its segments
//! are expanded.
//!
//! Network calls are split into `begin_*` / `finish_*` pairs so the owner
//! can release its lock while a request is in flight. The convenience
//! methods `lookup`, `select` and `submit` run a whole exchange for callers
//! that own the form outright.

mod expansion;
mod presentation;


use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::domain::{Itinerary, LineSegment, SegmentId};
use crate::journey::{JourneyError, JourneyPlanner, JourneyRequest};
use crate::places::{PlaceLookup, PlacePrediction, PlaceProvider, PlacesError};

pub use expansion::ExpansionSet;
pub use presentation::{EntryMarker, ExitMarker, SegmentPresentation, present};

/// Shown when submitting without both locations.
pub const MSG_MISSING_LOCATIONS: &str = "Please select both locations";
/// Shown when a selected place cannot be resolved.
pub const MSG_SELECT_FAILED: &str = "Error selecting location";
/// Shown when a journey was planned.
pub const MSG_PLAN_SUCCEEDED: &str = "Route calculated successfully!";
/// Shown for any journey request failure.
pub const MSG_PLAN_FAILED: &str = "Failed to calculate route. Please try again.";

/// One of the two location inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    From,
    To,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::From => "from",
            Field::To => "to",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown field name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown location field: {0}")]
pub struct InvalidField(String);

impl FromStr for Field {
    type Err = InvalidField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "from" => Ok(Field::From),
            "to" => Ok(Field::To),
            other => Err(InvalidField(other.to_string())),
        }
    }
}

/// Errors from form operations.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// Submit attempted without both resolved locations
    #[error("both locations must be selected")]
    MissingLocations,

    /// A journey request is already in flight
    #[error("a journey request is already in progress")]
    Busy,

    /// The segment id does not belong to the current itinerary
    #[error("no segment {0} in the current itinerary")]
    UnknownSegment(SegmentId),

    /// The journey request failed
    #[error("journey request failed: {0}")]
    PlanFailed(#[source] JourneyError),
}

/// Lifecycle of the journey submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Loading,
    Failed,
    Succeeded,
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A one-shot message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// State of one location input.
#[derive(Debug, Clone, Default)]
pub struct LocationInput {
    query: String,
    resolved: Option<String>,
    predictions: Vec<PlacePrediction>,
    /// Bumped on every change that makes in-flight lookups obsolete
    generation: u64,
}

impl LocationInput {
    /// Text currently in the input.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Address chosen from the predictions, if any.
    pub fn resolved(&self) -> Option<&str> {
        self.resolved.as_deref()
    }

    /// Predictions for the current query.
    pub fn predictions(&self) -> &[PlacePrediction] {
        &self.predictions
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }
}

/// A lookup in flight, tagged with the query it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    field: Field,
    generation: u64,
    query: String,
}

impl LookupTicket {
    pub fn field(&self) -> Field {
        self.field
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// The travel form controller. See the module docs.
#[derive(Debug, Default)]
pub struct TravelForm {
    from: LocationInput,
    to: LocationInput,
    active: Option<Field>,
    status: SubmitStatus,
    result: Option<Itinerary>,
    planned_at: Option<DateTime<Local>>,
    expanded: ExpansionSet,
    notifications: Vec<Notification>,
}

impl TravelForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self, field: Field) -> &LocationInput {
        match field {
            Field::From => &self.from,
            Field::To => &self.to,
        }
    }

    fn input_mut(&mut self, field: Field) -> &mut LocationInput {
        match field {
            Field::From => &mut self.from,
            Field::To => &mut self.to,
        }
    }

    /// The field whose prediction list is open.
    pub fn active(&self) -> Option<Field> {
        self.active
    }

    /// Predictions to display for `field`: only while it is the active field.
    pub fn visible_predictions(&self, field: Field) -> &[PlacePrediction] {
        if self.active == Some(field) {
            self.input(field).predictions()
        } else {
            &[]
        }
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SubmitStatus::Loading
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.from.resolved.is_some() && self.to.resolved.is_some() && !self.is_loading()
    }

    pub fn result(&self) -> Option<&Itinerary> {
        self.result.as_ref()
    }

    /// When the current itinerary was received.
    pub fn planned_at(&self) -> Option<DateTime<Local>> {
        self.planned_at
    }

    pub fn expanded(&self) -> &ExpansionSet {
        &self.expanded
    }

    // --- Typing and predictions ---

    /// Record new text in `field`.
    ///
    /// Makes `field` active and invalidates lookups issued for older text.
    pub fn set_query(&mut self, field: Field, text: impl Into<String>) {
        let input = self.input_mut(field);
        input.query = text.into();
        input.invalidate();
        if input.query.trim().is_empty() {
            input.predictions.clear();
        }
        self.active = Some(field);
    }

    /// Open the prediction list of `field`.
    pub fn focus(&mut self, field: Field) {
        self.active = Some(field);
    }

    /// Close the prediction lists (interaction outside the inputs).
    ///
    /// Predictions are dropped and lookups still in flight will be discarded.
    pub fn dismiss(&mut self) {
        self.active = None;
        for input in [&mut self.from, &mut self.to] {
            input.predictions.clear();
            input.invalidate();
        }
    }

    /// Tag a lookup for the current text of `field`.
    pub fn begin_lookup(&self, field: Field) -> LookupTicket {
        let input = self.input(field);
        LookupTicket {
            field,
            generation: input.generation,
            query: input.query.clone(),
        }
    }

    /// Store lookup results unless the ticket has gone stale.
    ///
    /// Returns whether the predictions were applied.
    pub fn apply_predictions(
        &mut self,
        ticket: &LookupTicket,
        predictions: Vec<PlacePrediction>,
    ) -> bool {
        let input = self.input_mut(ticket.field);
        if input.generation != ticket.generation {
            return false;
        }
        input.predictions = predictions;
        true
    }

    /// Look up predictions for the current text of `field`.
    pub async fn lookup<P: PlaceProvider>(&mut self, field: Field, places: &PlaceLookup<P>) -> bool {
        let ticket = self.begin_lookup(field);
        let predictions = places.predictions(ticket.query()).await;
        self.apply_predictions(&ticket, predictions)
    }

    // --- Selection ---

    /// Find the offered prediction with `place_id`.
    pub fn begin_select(&self, field: Field, place_id: &str) -> Option<PlacePrediction> {
        self.input(field)
            .predictions
            .iter()
            .find(|p| p.place_id == place_id)
            .cloned()
    }

    /// Store the outcome of resolving a selection.
    ///
    /// On success the address replaces the typed text and the prediction
    /// list closes. On failure the user is notified.
    pub fn finish_select(&mut self, field: Field, outcome: Result<String, PlacesError>) -> bool {
        match outcome {
            Ok(address) => {
                let input = self.input_mut(field);
                input.resolved = Some(address.clone()).filter(|a| !a.trim().is_empty());
                input.query = address;
                input.predictions.clear();
                input.invalidate();
                self.active = None;
                true
            }
            Err(e) => {
                warn!(field = %field, error = %e, "error selecting location");
                self.notify(Notification::error(MSG_SELECT_FAILED));
                false
            }
        }
    }

    /// Resolve the prediction with `place_id` and store it in `field`.
    ///
    /// Returns `false` if no such prediction is on offer or resolution failed.
    pub async fn select<P: PlaceProvider>(
        &mut self,
        field: Field,
        place_id: &str,
        places: &PlaceLookup<P>,
    ) -> bool {
        let Some(prediction) = self.begin_select(field, place_id) else {
            return false;
        };
        let outcome = places.resolve(&prediction).await;
        self.finish_select(field, outcome)
    }

    // --- Submission ---

    /// Validate and enter the loading state.
    ///
    /// Fails without side effects on the network when a location is
    /// missing or a request is already in flight.
    pub fn begin_submit(&mut self) -> Result<JourneyRequest, FormError> {
        if self.is_loading() {
            return Err(FormError::Busy);
        }

        let (Some(from), Some(to)) = (self.from.resolved(), self.to.resolved()) else {
            self.notify(Notification::error(MSG_MISSING_LOCATIONS));
            return Err(FormError::MissingLocations);
        };

        let request = JourneyRequest::new(from, to).map_err(|_| {
            self.notify(Notification::error(MSG_MISSING_LOCATIONS));
            FormError::MissingLocations
        })?;

        self.status = SubmitStatus::Loading;
        Ok(request)
    }

    /// Leave the loading state with the journey endpoint's answer.
    ///
    /// A new itinerary discards the expansion state of the old one. A failure
    /// keeps whatever itinerary was shown before.
    pub fn finish_submit(&mut self, outcome: Result<Itinerary, JourneyError>) -> Result<(), FormError> {
        match outcome {
            Ok(itinerary) => {
                info!(
                    stations = itinerary.stations.len(),
                    interchanges = itinerary.total_interchanges,
                    "route calculated"
                );
                self.result = Some(itinerary);
                self.planned_at = Some(Local::now());
                self.expanded.clear();
                self.status = SubmitStatus::Succeeded;
                self.notify(Notification::success(MSG_PLAN_SUCCEEDED));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "error fetching travel data");
                self.status = SubmitStatus::Failed;
                self.notify(Notification::error(MSG_PLAN_FAILED));
                Err(FormError::PlanFailed(e))
            }
        }
    }

    /// Leave the loading state when the journey endpoint's answer will never
    /// arrive, e.g. because the request driving it was dropped.
    ///
    /// Does nothing unless a submission is in flight.
    pub fn abandon_submit(&mut self) {
        if self.status != SubmitStatus::Loading {
            return;
        }
        warn!("journey request abandoned before it completed");
        self.status = SubmitStatus::Failed;
        self.notify(Notification::error(MSG_PLAN_FAILED));
    }

    /// Submit the form and wait for the journey endpoint.
    pub async fn submit<J: JourneyPlanner>(&mut self, planner: &J) -> Result<(), FormError> {
        let request = self.begin_submit()?;
        let outcome = planner.plan(&request).await;
        self.finish_submit(outcome)
    }

    // --- Itinerary display ---

    /// Line segments of the current itinerary.
    pub fn segments(&self) -> Vec<LineSegment<'_>> {
        self.result
            .as_ref()
            .map(Itinerary::segments)
            .unwrap_or_default()
    }

    /// Presentation of the current itinerary's segments.
    pub fn presentation(&self) -> Vec<SegmentPresentation<'_>> {
        present(&self.segments(), &self.expanded)
    }

    /// Expand or collapse a segment of the current itinerary.
    ///
    /// Returns whether it is now expanded.
    pub fn toggle_segment(&mut self, id: SegmentId) -> Result<bool, FormError> {
        let known = self
            .segments()
            .iter()
            .enumerate()
            .any(|(position, seg)| SegmentId::new(seg.line(), position) == id);

        if !known {
            return Err(FormError::UnknownSegment(id));
        }

        Ok(self.expanded.toggle(id))
    }

    // --- Notifications ---

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Pending notifications, without removing them.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Remove and return pending notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
