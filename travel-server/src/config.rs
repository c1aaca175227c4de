//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::journey::{self, JourneyConfig};
use crate::places::{self, PlacesConfig};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

/// Errors from reading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid number: {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} is not a valid socket address: {value:?}")]
    InvalidAddress { var: &'static str, value: String },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the journey endpoint
    pub journey_base_url: String,
    /// Places credential; lookups are disabled without one
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub places_country: String,
    /// Quiet period before a keystroke is looked up
    pub debounce: Duration,
    /// Timeout for outbound requests, in seconds
    pub http_timeout_secs: u64,
    pub bind_addr: SocketAddr,
    pub static_dir: String,
    /// Sessions idle for longer than this are dropped
    pub session_idle: Duration,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`.
    ///
    /// Unset and blank variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let number = |var: &'static str, default: u64| -> Result<u64, ConfigError> {
            match get(var) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber { var, value }),
                None => Ok(default),
            }
        };

        let bind_value = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                var: "BIND_ADDR",
                value: bind_value.clone(),
            })?;

        let journey_base_url =
            get("JOURNEY_API_BASE_URL").unwrap_or_else(|| journey::DEFAULT_BASE_URL.to_string());

        Ok(Self {
            journey_base_url,
            places_api_key: get("PLACES_API_KEY"),
            places_base_url: get("PLACES_BASE_URL")
                .unwrap_or_else(|| places::DEFAULT_BASE_URL.to_string()),
            places_country: get("PLACES_COUNTRY")
                .unwrap_or_else(|| places::DEFAULT_COUNTRY.to_string()),
            debounce: Duration::from_millis(
                number("DEBOUNCE_MS", DEFAULT_DEBOUNCE.as_millis() as u64)?,
            ),
            http_timeout_secs: number("HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            bind_addr,
            static_dir: get("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            session_idle: Duration::from_secs(number(
                "SESSION_IDLE_SECS",
                DEFAULT_SESSION_IDLE_SECS,
            )?),
        })
    }

    /// Journey client configuration.
    pub fn journey(&self) -> JourneyConfig {
        JourneyConfig::new(&self.journey_base_url).with_timeout(self.http_timeout_secs)
    }

    /// Places client configuration, if a credential is present.
    pub fn places(&self) -> Option<PlacesConfig> {
        let key = self.places_api_key.as_ref()?;
        Some(
            PlacesConfig::new(key)
                .with_base_url(&self.places_base_url)
                .with_country(&self.places_country)
                .with_timeout(self.http_timeout_secs),
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            journey_base_url: journey::DEFAULT_BASE_URL.to_string(),
            places_api_key: None,
            places_base_url: places::DEFAULT_BASE_URL.to_string(),
            places_country: places::DEFAULT_COUNTRY.to_string(),
            debounce: DEFAULT_DEBOUNCE,
            http_timeout_secs: DEFAULT_TIMEOUT_SECS,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        }
    }
}
