//! Web layer for the travel planner.
//!
//! Server-rendered pages backed by one [`TravelForm`](crate::form::TravelForm)
//! per visitor session, plus small HTML/JSON endpoints for keystrokes.

mod dto;
mod routes;
pub mod session;
mod state;
pub mod templates;

#[cfg(test)]
mod routes_tests;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use session::{SESSION_COOKIE, SessionConfig, SessionStore};
pub use state::AppState;
pub use templates::*;
