//! Per-visitor sessions.
//!
//! Each visitor gets one [`TravelForm`], their display preferences and a
//! debouncer per location field. Sessions are identified by a random cookie
//! and dropped after a period of inactivity.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue, header};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use moka::future::Cache as MokaCache;
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::debounce::{DEFAULT_DEBOUNCE, Debouncer};
use crate::domain::Preferences;
use crate::form::{Field, TravelForm};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "travel_session";

/// Longest cookie value accepted as a session id.
const MAX_ID_LEN: usize = 64;

/// Configuration for the session store.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sessions unused for this long are dropped.
    pub idle: Duration,

    /// Maximum number of live sessions.
    pub max_capacity: u64,

    /// Quiet period for keystroke lookups.
    pub debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle: Duration::from_secs(30 * 60),
            max_capacity: 10_000,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// State kept for one visitor.
#[derive(Debug)]
pub struct Session {
    /// Never hold this lock across a network call.
    pub form: Mutex<TravelForm>,
    pub prefs: Mutex<Preferences>,
    from_debounce: Debouncer,
    to_debounce: Debouncer,
}

impl Session {
    pub fn new(debounce: Duration) -> Self {
        Self {
            form: Mutex::new(TravelForm::new()),
            prefs: Mutex::new(Preferences::default()),
            from_debounce: Debouncer::new(debounce),
            to_debounce: Debouncer::new(debounce),
        }
    }

    /// The debouncer for keystrokes in `field`.
    pub fn debouncer(&self, field: Field) -> &Debouncer {
        match field {
            Field::From => &self.from_debounce,
            Field::To => &self.to_debounce,
        }
    }
}

/// Marks a journey request in flight for a session.
///
/// If dropped before [`PendingSubmit::complete`], the form leaves the
/// loading state through [`TravelForm::abandon_submit`]. This covers a
/// request future dropped mid-flight, e.g. when the client disconnects.
#[derive(Debug)]
pub struct PendingSubmit {
    session: Option<Arc<Session>>,
}

impl PendingSubmit {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// The outcome is being recorded; nothing to undo.
    pub fn complete(mut self) {
        self.session = None;
    }
}

impl Drop for PendingSubmit {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        // The lock is free unless another request on this session holds it
        if let Ok(mut form) = session.form.try_lock() {
            form.abandon_submit();
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    session.form.lock().await.abandon_submit();
                });
            }
            Err(_) => warn!("no runtime to release an abandoned submission"),
        }
    }
}

/// A session looked up for a request.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub id: String,
    pub session: Arc<Session>,
    /// The visitor has no cookie for this session yet
    pub is_new: bool,
}

impl SessionHandle {
    /// `Set-Cookie` value to send when the session is new.
    pub fn set_cookie(&self) -> Option<HeaderValue> {
        if !self.is_new {
            return None;
        }
        HeaderValue::from_str(&format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
            self.id
        ))
        .ok()
    }
}

/// All live sessions, keyed by id.
#[derive(Clone)]
pub struct SessionStore {
    sessions: MokaCache<String, Arc<Session>>,
    debounce: Duration,
}

impl SessionStore {
    /// Create a new store with the given configuration.
    pub fn new(config: &SessionConfig) -> Self {
        let sessions = MokaCache::builder()
            .time_to_idle(config.idle)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            sessions,
            debounce: config.debounce,
        }
    }

    /// Find the session named by the request's cookie, or start one.
    ///
    /// Ids are only ever issued here: a cookie naming an unknown or expired
    /// session gets a fresh session under a new id.
    pub async fn resolve(&self, headers: &HeaderMap) -> SessionHandle {
        if let Some(id) = session_id(headers) {
            if let Some(session) = self.sessions.get(&id).await {
                return SessionHandle {
                    id,
                    session,
                    is_new: false,
                };
            }
            debug!(session = %id, "unknown session id replaced");
        }

        let id = new_session_id();
        let session = Arc::new(Session::new(self.debounce));
        self.sessions.insert(id.clone(), session.clone()).await;
        debug!(session = %id, "session started");
        SessionHandle {
            id,
            session,
            is_new: true,
        }
    }

    /// Look up an existing session without creating one.
    pub async fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.get(id).await
    }
}

/// Generate a fresh random session id.
pub fn new_session_id() -> String {
    let bytes = rand::rng().random::<u128>().to_le_bytes();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Extract a well-formed session id from the `Cookie` header.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| is_valid_id(value))
        .map(str::to_string)
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
