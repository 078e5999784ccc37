// HTTP error responses for the wiki surface.
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::storage::StoreError;

/// Request-level failures that reach the visitor.
///
/// Deliberately small: a page that does not exist is never an error here (it
/// becomes a redirect or an empty edit form in the handlers), and a missing
/// session is a redirect issued by the gate. What remains is an invalid path
/// and genuine storage or rendering failure.
#[derive(Debug)]
pub enum AppError {
    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            AppError::NotFound(msg) => msg,
            AppError::InternalServerError(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }

    /// A path that does not match the page grammar. Nothing downstream of
    /// the router ever sees these requests.
    pub fn route_invalid() -> Self {
        AppError::NotFound("no such page or action".to_string())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        AppError::InternalServerError(message.into())
    }
}

// Storage failures surface verbatim; NotFound is expected to be recovered by
// the handlers before an error response is built, but mapping it keeps `?`
// usable everywhere.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(title) => AppError::not_found(format!("no page '{}'", title)),
            StoreError::Io(e) => {
                tracing::error!("page storage error: {}", e);
                AppError::internal_server_error(format!("page storage failure: {}", e))
            }
        }
    }
}

impl From<crate::render::RenderError> for AppError {
    fn from(err: crate::render::RenderError) -> Self {
        tracing::error!("template rendering error: {}", err);
        AppError::internal_server_error(format!("failed to render page: {}", err))
    }
}

// Standard error trait implementations
impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
