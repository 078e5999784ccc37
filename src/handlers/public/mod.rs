//! Ungated surface: the landing page, the login form, and session
//! issuance/revocation.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::config;
use crate::error::AppError;
use crate::render::Template;
use crate::session::{self, REQUESTED_PATH_KEY, USER_ID_KEY};
use crate::state::AppState;

/// GET / - landing page
pub async fn front(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.renderer.render(Template::Front, None)?))
}

/// GET /login - login form
pub async fn login_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.renderer.render(Template::Login, None)?))
}

/// GET|POST /session/new - mint an authenticated session.
///
/// Credential verification belongs to an external identity collaborator that
/// does not exist in this system; logging in mints a fresh opaque token whose
/// presence is all the gate ever inspects. The visitor is returned to the
/// path the gate captured before the login detour, or the front page.
pub async fn session_new(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let cookie_name = &config::config().session.cookie_name;
    let cookie = session::cookie_value(&headers, cookie_name);
    let mut visitor = state.sessions.load(cookie.as_deref());

    visitor.set(USER_ID_KEY, Uuid::new_v4().to_string());
    let destination = visitor
        .remove(REQUESTED_PATH_KEY)
        .unwrap_or_else(|| "/".to_string());
    state.sessions.persist(&visitor);

    tracing::info!(session = %visitor.id(), %destination, "session issued");

    redirect_with_session(&destination, &visitor, cookie_name)
}

/// GET|POST /session/destroy - drop authentication.
///
/// Idempotent: revoking an already-anonymous session just redirects.
pub async fn session_destroy(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let cookie_name = &config::config().session.cookie_name;
    let cookie = session::cookie_value(&headers, cookie_name);
    let mut visitor = state.sessions.load(cookie.as_deref());

    if visitor.remove(USER_ID_KEY).is_some() {
        tracing::info!(session = %visitor.id(), "session revoked");
    }
    state.sessions.persist(&visitor);

    redirect_with_session("/", &visitor, cookie_name)
}

fn redirect_with_session(
    destination: &str,
    visitor: &session::SessionHandle,
    cookie_name: &str,
) -> Response {
    let mut response = Redirect::to(destination).into_response();
    if let Ok(value) = HeaderValue::from_str(&visitor.cookie(cookie_name)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
