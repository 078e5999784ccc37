//! Per-visitor session state.
//!
//! A session is an opaque key-value bag correlated across requests by a
//! cookie carrying the session id. The core only ever stores two keys in it:
//! `user_id` (presence means "authenticated") and `requested_path` (where to
//! send the visitor after login). Token contents are never inspected.
//!
//! Storage is in-process; nothing here survives a restart, which is fine for
//! a store whose only meaningful content is "logged in or not".

pub mod gate;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::http::header::{HeaderMap, COOKIE};
use uuid::Uuid;

/// Session key holding the authentication token. Presence, not value, is
/// what the gate checks.
pub const USER_ID_KEY: &str = "user_id";

/// Session key carrying the path the visitor asked for before being sent to
/// the login flow.
pub const REQUESTED_PATH_KEY: &str = "requested_path";

type SessionValues = HashMap<String, String>;

/// Upper bound on live sessions. Every anonymous hit on a gated path mints
/// one session to carry `requested_path`, so without a cap the table grows
/// with unauthenticated traffic.
const MAX_SESSIONS: usize = 100_000;

/// Shared session store, cheap to clone into handlers and middleware.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionValues>>>,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::bounded(MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding at most `max_sessions` sessions at once.
    pub fn bounded(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions,
        }
    }

    /// Fetch the session for a cookie value, or transparently create a fresh
    /// empty one when the cookie is missing, malformed, or unknown. Reading
    /// a session is never an error path; a degraded store just means the
    /// visitor looks anonymous and gets sent through login again.
    pub fn load(&self, cookie_value: Option<&str>) -> SessionHandle {
        if let Some(id) = cookie_value.and_then(|v| Uuid::parse_str(v).ok()) {
            let known = match self.sessions.read() {
                Ok(map) => map.get(&id).cloned(),
                Err(poisoned) => poisoned.into_inner().get(&id).cloned(),
            };
            if let Some(values) = known {
                return SessionHandle { id, values };
            }
        }
        SessionHandle {
            id: Uuid::new_v4(),
            values: SessionValues::new(),
        }
    }

    /// Write a handle's values back. Overwrites whatever the store held for
    /// that id. At capacity, an arbitrary existing session is evicted to
    /// make room; the evicted visitor simply goes through login again.
    pub fn persist(&self, session: &SessionHandle) {
        let mut map = match self.sessions.write() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        if map.len() >= self.max_sessions && !map.contains_key(&session.id) {
            if let Some(victim) = map.keys().next().copied() {
                tracing::debug!(session = %victim, "session table full, evicting");
                map.remove(&victim);
            }
        }
        map.insert(session.id, session.values.clone());
    }
}

/// A visitor's session for the duration of one request. Mutations are local
/// until `SessionStore::persist` is called.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: Uuid,
    values: SessionValues,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Whether this session carries an authentication token.
    pub fn is_authenticated(&self) -> bool {
        self.values.contains_key(USER_ID_KEY)
    }

    /// The `Set-Cookie` value that ties this session to the visitor.
    pub fn cookie(&self, name: &str) -> String {
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, self.id)
    }
}

/// Pull a named cookie's value out of the request headers. Multiple `Cookie`
/// headers and multiple pairs per header are both legal.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| {
            let (k, v) = pair.trim().split_once('=')?;
            (k == name).then(|| v.to_string())
        })
        .next()
}
