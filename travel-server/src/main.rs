use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use travel_server::config::AppConfig;
use travel_server::journey::JourneyClient;
use travel_server::places::{PlaceLookup, PlacesClient};
use travel_server::web::{AppState, SessionConfig, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Place lookup stays inert without a credential
    let places = PlaceLookup::new();
    match config.places() {
        Some(places_config) => {
            let client = PlacesClient::new(places_config).expect("Failed to create places client");
            places
                .init(client)
                .expect("Places client initialised twice");
            info!(country = %config.places_country, "place lookup enabled");
        }
        None => warn!("PLACES_API_KEY not set. Location suggestions are disabled."),
    }

    let journey =
        JourneyClient::new(config.journey()).expect("Failed to create journey client");
    info!(url = journey.url(), "journey endpoint");

    let sessions = SessionConfig {
        idle: config.session_idle,
        debounce: config.debounce,
        ..SessionConfig::default()
    };

    let state = AppState::new(places, journey, &sessions);
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    info!("Travel planner listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
