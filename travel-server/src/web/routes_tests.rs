//! Router tests against in-process fakes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use tower::ServiceExt;

use super::*;
use crate::domain::{Distance, Itinerary, Station, StationCode};
use crate::journey::{JourneyError, JourneyPlanner, JourneyRequest};
use crate::places::{
    PlaceDetails, PlaceLookup, PlacePrediction, PlaceProvider, PlacesError, StructuredFormatting,
};

// --- Fakes ---

#[derive(Default)]
struct FakePlaces {
    predictions: HashMap<String, Vec<PlacePrediction>>,
    addresses: HashMap<String, String>,
}

impl FakePlaces {
    fn with_place(mut self, query: &str, id: &str, main: &str, address: &str) -> Self {
        self.predictions
            .entry(query.to_string())
            .or_default()
            .push(PlacePrediction {
                place_id: id.to_string(),
                description: address.to_string(),
                structured_formatting: StructuredFormatting {
                    main_text: main.to_string(),
                    secondary_text: "Kuala Lumpur".to_string(),
                },
            });
        self.addresses.insert(id.to_string(), address.to_string());
        self
    }
}

impl PlaceProvider for FakePlaces {
    async fn autocomplete(&self, query: &str) -> Result<Vec<PlacePrediction>, PlacesError> {
        Ok(self.predictions.get(query).cloned().unwrap_or_default())
    }

    async fn details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        self.addresses
            .get(place_id)
            .map(|address| PlaceDetails {
                formatted_address: Some(address.clone()),
                name: None,
            })
            .ok_or(PlacesError::Status {
                status: "NOT_FOUND",
                message: None,
            })
    }
}

struct FakePlanner {
    fail: bool,
    /// The first request never gets an answer
    stall_first: AtomicBool,
    requests: Mutex<Vec<JourneyRequest>>,
}

impl FakePlanner {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            stall_first: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn stalling() -> Self {
        let planner = Self::new(false);
        planner.stall_first.store(true, Ordering::SeqCst);
        planner
    }
}

impl JourneyPlanner for FakePlanner {
    async fn plan(&self, request: &JourneyRequest) -> Result<Itinerary, JourneyError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.stall_first.swap(false, Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail {
            return Err(JourneyError::Api {
                status: 500,
                message: "Internal Server Error".into(),
            });
        }
        Ok(itinerary())
    }
}

fn itinerary() -> Itinerary {
    let station = |code: &str, name: &str| Station::new(StationCode::parse(code).unwrap(), name);
    Itinerary {
        walk_to_station: Distance::new(0.35, 4.4).unwrap(),
        walk_from_station: Distance::new(0.8, 10.0).unwrap(),
        total_walking: Distance::new(1.15, 14.4).unwrap(),
        total_stops: 4,
        total_interchanges: 1,
        stations: vec![
            station("KJ10", "KLCC"),
            station("KJ11", "Kampung Baru"),
            station("KJ12", "Dang Wangi"),
            station("SP3", "Plaza Rakyat"),
        ],
    }
}

fn places() -> FakePlaces {
    FakePlaces::default()
        .with_place("klcc", "id-klcc", "KLCC", "KLCC, 50088 Kuala Lumpur")
        .with_place("rakyat", "id-rakyat", "Plaza Rakyat", "Plaza Rakyat, 50150 Kuala Lumpur")
}

fn app_with(planner: FakePlanner, debounce: Duration) -> (Router, AppState<FakePlaces, FakePlanner>) {
    let lookup = PlaceLookup::new();
    lookup.init(places()).unwrap();

    let sessions = SessionConfig {
        debounce,
        ..SessionConfig::default()
    };
    let state = AppState::new(lookup, planner, &sessions);
    (create_router(state.clone(), "static"), state)
}

fn app(planner: FakePlanner) -> (Router, AppState<FakePlaces, FakePlanner>) {
    app_with(planner, Duration::ZERO)
}

// --- Request helpers ---

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri).header(header::ACCEPT, "text/html");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, cookie: &str, body: &str, html: bool) -> Request<Body> {
    Request::post(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(
            header::ACCEPT,
            if html { "text/html" } else { "application/json" },
        )
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// Start a session and return its cookie.
async fn start_session(app: &Router) -> String {
    let response = send(app, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("new session sets a cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// Type and select both locations.
async fn choose_locations(app: &Router, cookie: &str) {
    for (field, query, id) in [("from", "klcc", "id-klcc"), ("to", "rakyat", "id-rakyat")] {
        let response = send(
            app,
            post(&format!("/places/{field}"), cookie, &format!("q={query}"), false),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(
            app,
            post(
                &format!("/places/{field}/select"),
                cookie,
                &format!("place_id={id}"),
                true,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}

// --- Tests ---

#[tokio::test]
async fn health_check() {
    let (app, _) = app(FakePlanner::new(false));
    let response = send(&app, get("/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn index_starts_session() {
    let (app, state) = app(FakePlanner::new(false));
    let cookie = start_session(&app).await;

    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));
    let (_, id) = cookie.split_once('=').unwrap();
    assert!(state.sessions.get(id).await.is_some());

    // Returning visitor is not issued a new cookie
    let response = send(&app, get("/", Some(&cookie))).await;
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let html = body_string(response).await;
    assert!(html.contains("Plan Your Journey"));
    assert!(html.contains("Get Directions"));
}

#[tokio::test]
async fn unknown_field_is_rejected() {
    let (app, _) = app(FakePlanner::new(false));
    let cookie = start_session(&app).await;

    let response = send(&app, post("/places/via", &cookie, "q=klcc", false)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn keystroke_returns_json_predictions() {
    let (app, _) = app(FakePlanner::new(false));
    let cookie = start_session(&app).await;

    let response = send(&app, post("/places/from", &cookie, "q=klcc", false)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let predictions = json["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0]["place_id"], "id-klcc");
    assert_eq!(predictions[0]["structured_formatting"]["main_text"], "KLCC");
}

#[tokio::test]
async fn keystroke_returns_html_fragment() {
    let (app, _) = app(FakePlanner::new(false));
    let cookie = start_session(&app).await;

    let response = send(&app, post("/places/to", &cookie, "q=rakyat", true)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("/places/to/select"));
    assert!(html.contains("Plaza Rakyat"));
    assert!(!html.contains("<html"));
}

#[tokio::test(start_paused = true)]
async fn superseded_keystroke_answers_no_content() {
    let (app, _) = app_with(FakePlanner::new(false), Duration::from_millis(300));
    let cookie = start_session(&app).await;

    let first = send(&app, post("/places/from", &cookie, "q=kl", false));
    let second = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        send(&app, post("/places/from", &cookie, "q=klcc", false)).await
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.status(), StatusCode::NO_CONTENT);
    assert_eq!(second.status(), StatusCode::OK);
    let json = body_json(second).await;
    assert_eq!(json["predictions"][0]["place_id"], "id-klcc");
}

#[tokio::test]
async fn plan_without_locations_sends_nothing() {
    let (app, state) = app(FakePlanner::new(false));
    let cookie = start_session(&app).await;

    let response = send(&app, post("/plan", &cookie, "", false)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "both locations must be selected");
    assert!(state.journey.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn plan_returns_itinerary_json() {
    let (app, state) = app(FakePlanner::new(false));
    let cookie = start_session(&app).await;
    choose_locations(&app, &cookie).await;

    let response = send(&app, post("/plan", &cookie, "", false)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total_interchanges"], 1);
    assert_eq!(json["stations"].as_array().unwrap().len(), 4);
    assert_eq!(json["walk_to_station"]["kilometers"], 0.35);

    let requests = state.journey.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].from(), "KLCC, 50088 Kuala Lumpur");
    assert_eq!(requests[0].destination(), "Plaza Rakyat, 50150 Kuala Lumpur");
}

#[tokio::test]
async fn plan_in_browser_renders_itinerary() {
    let (app, _) = app(FakePlanner::new(false));
    let cookie = start_session(&app).await;
    choose_locations(&app, &cookie).await;

    let response = send(&app, post("/plan", &cookie, "", true)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

    let html = body_string(send(&app, get("/", Some(&cookie))).await).await;
    assert!(html.contains("Route calculated successfully!"));
    assert!(html.contains("Journey Details"));
    assert!(html.contains("0.35 km • 4 min"));
    assert!(html.contains("4 stops"));
    assert!(html.contains("1 changes"));
    assert!(html.contains("Change Line"));
    assert!(html.contains("Kelana Jaya Line"));
    assert!(html.contains("#2563eb"));

    // Toasts are shown once
    let html = body_string(send(&app, get("/", Some(&cookie))).await).await;
    assert!(!html.contains("Route calculated successfully!"));
}

#[tokio::test]
async fn failed_plan_is_bad_gateway() {
    let (app, _) = app(FakePlanner::new(true));
    let cookie = start_session(&app).await;
    choose_locations(&app, &cookie).await;

    let response = send(&app, post("/plan", &cookie, "", false)).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // The form is usable again
    let html = body_string(send(&app, get("/", Some(&cookie))).await).await;
    assert!(html.contains("Get Directions"));
    assert!(!html.contains("Journey Details"));
}

#[tokio::test]
async fn failed_plan_in_browser_shows_toast() {
    let (app, _) = app(FakePlanner::new(true));
    let cookie = start_session(&app).await;
    choose_locations(&app, &cookie).await;

    send(&app, post("/plan", &cookie, "", true)).await;

    let html = body_string(send(&app, get("/", Some(&cookie))).await).await;
    assert!(html.contains("Failed to calculate route. Please try again."));
}

#[tokio::test]
async fn dropped_plan_request_frees_the_form() {
    let (app, state) = app(FakePlanner::stalling());
    let cookie = start_session(&app).await;
    choose_locations(&app, &cookie).await;

    // The client gives up while the journey endpoint is still thinking
    let first = tokio::time::timeout(
        Duration::from_millis(100),
        send(&app, post("/plan", &cookie, "", true)),
    )
    .await;
    assert!(first.is_err());

    let html = body_string(send(&app, get("/", Some(&cookie))).await).await;
    assert!(html.contains("Failed to calculate route. Please try again."));
    assert!(html.contains("Get Directions"));
    assert!(!html.contains("Calculating..."));

    let response = send(&app, post("/plan", &cookie, "", false)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.journey.requests.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn toggle_segment_expands_stops() {
    let (app, _) = app(FakePlanner::new(false));
    let cookie = start_session(&app).await;
    choose_locations(&app, &cookie).await;
    send(&app, post("/plan", &cookie, "", false)).await;

    let response = send(&app, post("/segments/K-0/toggle", &cookie, "", false)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], "K-0");
    assert_eq!(json["expanded"], true);

    let html = body_string(send(&app, get("/", Some(&cookie))).await).await;
    assert!(html.contains("Kampung Baru"));

    let response = send(&app, post("/segments/K-0/toggle", &cookie, "", false)).await;
    assert_eq!(body_json(response).await["expanded"], false);
}

#[tokio::test]
async fn toggle_rejects_unknown_segments() {
    let (app, _) = app(FakePlanner::new(false));
    let cookie = start_session(&app).await;

    let response = send(&app, post("/segments/K-0/toggle", &cookie, "", false)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, post("/segments/nonsense/toggle", &cookie, "", false)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn preferences_toggle_independently() {
    let (app, _) = app(FakePlanner::new(false));
    let cookie = start_session(&app).await;

    let response = send(&app, post("/prefs/theme", &cookie, "", false)).await;
    let json = body_json(response).await;
    assert_eq!(json["theme"], "dark");
    assert_eq!(json["layout"], "default");

    let response = send(&app, post("/prefs/layout", &cookie, "", true)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = body_string(send(&app, get("/", Some(&cookie))).await).await;
    assert!(html.contains("data-theme=\"dark\""));
    assert!(html.contains("data-layout=\"compact\""));
}

#[tokio::test]
async fn focus_chooses_the_open_list() {
    let (app, _) = app(FakePlanner::new(false));
    let cookie = start_session(&app).await;

    send(&app, post("/places/from", &cookie, "q=klcc", false)).await;
    send(&app, post("/places/to", &cookie, "q=rakyat", false)).await;
    let html = body_string(send(&app, get("/", Some(&cookie))).await).await;
    assert!(html.contains("/places/to/select"));
    assert!(!html.contains("/places/from/select"));

    let response = send(&app, post("/places/from/focus", &cookie, "", false)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // A page rendered after a redirect opens the focused input's list
    let response = send(&app, post("/prefs/theme", &cookie, "", true)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let html = body_string(send(&app, get("/", Some(&cookie))).await).await;
    assert!(html.contains("/places/from/select"));
    assert!(!html.contains("/places/to/select"));

    let response = send(&app, post("/places/via/focus", &cookie, "", false)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dismiss_closes_predictions() {
    let (app, _) = app(FakePlanner::new(false));
    let cookie = start_session(&app).await;

    send(&app, post("/places/from", &cookie, "q=klcc", false)).await;
    let html = body_string(send(&app, get("/", Some(&cookie))).await).await;
    assert!(html.contains("/places/from/select"));

    let response = send(&app, post("/dismiss", &cookie, "", false)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let html = body_string(send(&app, get("/", Some(&cookie))).await).await;
    assert!(!html.contains("/places/from/select"));
}
