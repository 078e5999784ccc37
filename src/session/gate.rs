//! The authorization gate in front of the page handlers.
//!
//! Order matters: the path grammar is checked first, because an invalid path
//! carries no title worth redirecting back to. Only then is the session
//! consulted. An anonymous visitor is redirected to the login flow and the
//! request HALTS there; the wrapped handler never runs for an
//! unauthenticated request.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::config;
use crate::error::AppError;
use crate::routing::{self, RoutedRequest};
use crate::session::{self, REQUESTED_PATH_KEY};
use crate::state::AppState;

/// Where anonymous visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// The gate's verdict for one request. Kept as a pure function of the
/// session state so the authorization rule is testable without an HTTP
/// server; the middleware below only executes the verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Session carries a user token: invoke the handler with this routing.
    Proceed(RoutedRequest),
    /// No user token: halt and redirect here instead.
    RedirectTo(&'static str),
}

pub fn decide(authenticated: bool, routed: RoutedRequest) -> GateDecision {
    if authenticated {
        GateDecision::Proceed(routed)
    } else {
        GateDecision::RedirectTo(LOGIN_PATH)
    }
}

/// Middleware wrapping the view/edit/save routes.
pub async fn page_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // Grammar first. A failed match is a plain 404 and nothing else runs.
    let routed = match routing::parse_path(&path) {
        Ok(routed) => routed,
        Err(_) => {
            tracing::debug!(path = %path, "rejected path outside the page grammar");
            return AppError::route_invalid().into_response();
        }
    };

    let cookie_name = &config::config().session.cookie_name;
    let cookie = session::cookie_value(request.headers(), cookie_name);
    let mut visitor = state.sessions.load(cookie.as_deref());

    match decide(visitor.is_authenticated(), routed) {
        GateDecision::Proceed(routed) => {
            // The handlers only need the routed title; the session has done
            // its job once the gate opens
            request.extensions_mut().insert(routed);
            next.run(request).await
        }
        GateDecision::RedirectTo(login) => {
            // Remember where the visitor was headed so login can return them
            visitor.set(REQUESTED_PATH_KEY, path.as_str());
            state.sessions.persist(&visitor);
            tracing::debug!(path = %path, session = %visitor.id(), "anonymous request, redirecting to login");

            let mut response = Redirect::to(login).into_response();
            if let Ok(value) = HeaderValue::from_str(&visitor.cookie(cookie_name)) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Action;

    fn routed() -> RoutedRequest {
        RoutedRequest {
            action: Action::View,
            title: "Home".to_string(),
        }
    }

    #[test]
    fn authenticated_requests_proceed_with_their_routing() {
        match decide(true, routed()) {
            GateDecision::Proceed(r) => {
                assert_eq!(r.action, Action::View);
                assert_eq!(r.title, "Home");
            }
            other => panic!("expected Proceed, got {:?}", other),
        }
    }

    #[test]
    fn anonymous_requests_are_redirected_to_login() {
        assert_eq!(
            decide(false, routed()),
            GateDecision::RedirectTo(LOGIN_PATH)
        );
    }
}
