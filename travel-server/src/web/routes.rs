//! HTTP route handlers.
//!
//! Every handler finds the visitor's session first and sends the session
//! cookie back when the session is new. Form locks are only held between
//! network calls, never across one.

use std::sync::Arc;

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::{debug, error, warn};

use crate::domain::{InvalidSegmentId, Preferences, SegmentId};
use crate::form::{Field, FormError, InvalidField};
use crate::journey::JourneyPlanner;
use crate::places::PlaceProvider;

use super::dto::*;
use super::session::{PendingSubmit, SessionHandle};
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router<P, J>(state: AppState<P, J>, static_dir: &str) -> Router
where
    P: PlaceProvider + Send + Sync + 'static,
    J: JourneyPlanner + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index_page::<P, J>))
        .route("/health", get(health))
        .route("/places/:field", post(lookup_places::<P, J>))
        .route("/places/:field/select", post(select_place::<P, J>))
        .route("/places/:field/focus", post(focus_field::<P, J>))
        .route("/dismiss", post(dismiss::<P, J>))
        .route("/plan", post(plan_journey::<P, J>))
        .route("/segments/:id/toggle", post(toggle_segment::<P, J>))
        .route("/prefs/layout", post(toggle_layout::<P, J>))
        .route("/prefs/theme", post(toggle_theme::<P, J>))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Attach the session cookie to a response if the session is new.
fn with_session(handle: &SessionHandle, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    if let Some(cookie) = handle.set_cookie() {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

fn parse_field(raw: &str) -> Result<Field, AppError> {
    raw.parse().map_err(|e: InvalidField| AppError::BadRequest {
        message: e.to_string(),
    })
}

/// Index page: form, predictions and itinerary.
async fn index_page<P, J>(
    State(state): State<AppState<P, J>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    P: PlaceProvider + Send + Sync + 'static,
    J: JourneyPlanner + Send + Sync + 'static,
{
    let handle = state.sessions.resolve(&headers).await;
    let prefs = *handle.session.prefs.lock().await;

    let page = {
        let mut form = handle.session.form.lock().await;
        IndexTemplate::for_session(&mut form, prefs)
    };

    let html = page.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;

    Ok(with_session(&handle, Html(html)))
}

/// Keystroke in a location input.
///
/// Waits out the debounce delay; a keystroke superseded by a newer one, or
/// whose predictions arrive after the input changed again, answers
/// `204 No Content`.
async fn lookup_places<P, J>(
    State(state): State<AppState<P, J>>,
    Path(field): Path<String>,
    headers: HeaderMap,
    Form(body): Form<QueryForm>,
) -> Result<Response, AppError>
where
    P: PlaceProvider + Send + Sync + 'static,
    J: JourneyPlanner + Send + Sync + 'static,
{
    let field = parse_field(&field)?;
    let handle = state.sessions.resolve(&headers).await;
    let session = &handle.session;

    session.form.lock().await.set_query(field, body.q);

    if session.debouncer(field).settle(()).await.is_none() {
        debug!(%field, "keystroke superseded");
        return Ok(with_session(&handle, StatusCode::NO_CONTENT));
    }

    let ticket = session.form.lock().await.begin_lookup(field);
    let predictions = state.places.predictions(ticket.query()).await;

    let visible = {
        let mut form = session.form.lock().await;
        if form.apply_predictions(&ticket, predictions) {
            Some(form.visible_predictions(field).to_vec())
        } else {
            debug!(%field, query = ticket.query(), "stale predictions discarded");
            None
        }
    };

    let Some(predictions) = visible else {
        return Ok(with_session(&handle, StatusCode::NO_CONTENT));
    };

    let response = if accepts_html(&headers) {
        PredictionsTemplate {
            field: field.as_str(),
            predictions: PredictionView::list(&predictions),
        }
        .into_response()
    } else {
        Json(PredictionsResponse { predictions }).into_response()
    };

    Ok(with_session(&handle, response))
}

/// Choose one of the offered predictions.
async fn select_place<P, J>(
    State(state): State<AppState<P, J>>,
    Path(field): Path<String>,
    headers: HeaderMap,
    Form(body): Form<SelectForm>,
) -> Result<Response, AppError>
where
    P: PlaceProvider + Send + Sync + 'static,
    J: JourneyPlanner + Send + Sync + 'static,
{
    let field = parse_field(&field)?;
    let handle = state.sessions.resolve(&headers).await;
    let session = &handle.session;

    let prediction = session.form.lock().await.begin_select(field, &body.place_id);

    match prediction {
        Some(prediction) => {
            let outcome = state.places.resolve(&prediction).await;
            session.form.lock().await.finish_select(field, outcome);
        }
        None => debug!(%field, place_id = %body.place_id, "prediction no longer offered"),
    }

    Ok(with_session(&handle, Redirect::to("/")))
}

/// The visitor moved into a location input.
async fn focus_field<P, J>(
    State(state): State<AppState<P, J>>,
    Path(field): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    P: PlaceProvider + Send + Sync + 'static,
    J: JourneyPlanner + Send + Sync + 'static,
{
    let field = parse_field(&field)?;
    let handle = state.sessions.resolve(&headers).await;
    handle.session.form.lock().await.focus(field);

    if accepts_html(&headers) {
        Ok(with_session(&handle, Redirect::to("/")))
    } else {
        Ok(with_session(&handle, StatusCode::NO_CONTENT))
    }
}

/// Interaction outside the location inputs.
async fn dismiss<P, J>(
    State(state): State<AppState<P, J>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    P: PlaceProvider + Send + Sync + 'static,
    J: JourneyPlanner + Send + Sync + 'static,
{
    let handle = state.sessions.resolve(&headers).await;
    handle.session.form.lock().await.dismiss();

    if accepts_html(&headers) {
        Ok(with_session(&handle, Redirect::to("/")))
    } else {
        Ok(with_session(&handle, StatusCode::NO_CONTENT))
    }
}

/// Submit the form to the journey endpoint.
///
/// Browsers are redirected to the index page, which shows the outcome.
/// Other clients get the itinerary or an error as JSON.
async fn plan_journey<P, J>(
    State(state): State<AppState<P, J>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    P: PlaceProvider + Send + Sync + 'static,
    J: JourneyPlanner + Send + Sync + 'static,
{
    let handle = state.sessions.resolve(&headers).await;
    let session = &handle.session;

    let begun = session.form.lock().await.begin_submit();
    let (mut form, submitted) = match begun {
        Ok(request) => {
            // Releases the form if this future is dropped before the answer
            let pending = PendingSubmit::new(Arc::clone(session));
            let outcome = state.journey.plan(&request).await;
            let mut form = session.form.lock().await;
            pending.complete();
            let submitted = form.finish_submit(outcome);
            (form, submitted)
        }
        Err(e) => (session.form.lock().await, Err(e)),
    };

    if accepts_html(&headers) {
        drop(form);
        return Ok(with_session(&handle, Redirect::to("/")));
    }

    // JSON clients get the outcome directly rather than as toasts
    form.take_notifications();
    let itinerary = submitted.map(|()| form.result().cloned());
    drop(form);

    match itinerary {
        Ok(Some(itinerary)) => Ok(with_session(&handle, Json(itinerary))),
        Ok(None) => Err(AppError::Internal {
            message: "journey planned but no itinerary stored".to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Expand or collapse one segment of the itinerary.
async fn toggle_segment<P, J>(
    State(state): State<AppState<P, J>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    P: PlaceProvider + Send + Sync + 'static,
    J: JourneyPlanner + Send + Sync + 'static,
{
    let id: SegmentId = id.parse().map_err(|e: InvalidSegmentId| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let handle = state.sessions.resolve(&headers).await;
    let expanded = handle.session.form.lock().await.toggle_segment(id)?;

    if accepts_html(&headers) {
        Ok(with_session(&handle, Redirect::to("/")))
    } else {
        Ok(with_session(
            &handle,
            Json(ToggleResponse {
                id: id.to_string(),
                expanded,
            }),
        ))
    }
}

/// Switch between the default and compact layouts.
async fn toggle_layout<P, J>(
    State(state): State<AppState<P, J>>,
    headers: HeaderMap,
) -> Response
where
    P: PlaceProvider + Send + Sync + 'static,
    J: JourneyPlanner + Send + Sync + 'static,
{
    let handle = state.sessions.resolve(&headers).await;
    let prefs = {
        let mut prefs = handle.session.prefs.lock().await;
        prefs.toggle_layout();
        *prefs
    };
    prefs_response(&handle, &headers, prefs)
}

/// Switch between the light and dark themes.
async fn toggle_theme<P, J>(
    State(state): State<AppState<P, J>>,
    headers: HeaderMap,
) -> Response
where
    P: PlaceProvider + Send + Sync + 'static,
    J: JourneyPlanner + Send + Sync + 'static,
{
    let handle = state.sessions.resolve(&headers).await;
    let prefs = {
        let mut prefs = handle.session.prefs.lock().await;
        prefs.toggle_theme();
        *prefs
    };
    prefs_response(&handle, &headers, prefs)
}

fn prefs_response(handle: &SessionHandle, headers: &HeaderMap, prefs: Preferences) -> Response {
    if accepts_html(headers) {
        with_session(handle, Redirect::to("/"))
    } else {
        with_session(handle, Json(prefs))
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<FormError> for AppError {
    fn from(e: FormError) -> Self {
        let message = e.to_string();
        match e {
            FormError::MissingLocations => AppError::BadRequest { message },
            FormError::Busy => AppError::Conflict { message },
            FormError::UnknownSegment(_) => AppError::NotFound { message },
            FormError::PlanFailed(_) => AppError::BadGateway { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
