use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use wikid::config;
use wikid::handlers::{pages, public};
use wikid::render::HtmlRenderer;
use wikid::session::{gate, SessionStore};
use wikid::state::AppState;
use wikid::storage::FsPageStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up WIKID_PORT, WIKID_PAGES_DIR, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting wikid in {:?} mode", config.environment);

    let store = FsPageStore::open(&config.storage.pages_dir).with_context(|| {
        format!(
            "failed to open page store at {}",
            config.storage.pages_dir.display()
        )
    })?;

    let state = AppState::new(
        Arc::new(store),
        SessionStore::new(),
        Arc::new(HtmlRenderer::new()),
    );

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("wikid listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::front))
        .route("/login", get(public::login_form))
        .route("/health", get(health))
        .merge(session_routes())
        // Gated page operations
        .merge(page_routes(state.clone()))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn session_routes() -> Router<AppState> {
    Router::new()
        // GET as well as POST so the login form can be a plain link
        .route(
            "/session/new",
            get(public::session_new).post(public::session_new),
        )
        .route(
            "/session/destroy",
            get(public::session_destroy).post(public::session_destroy),
        )
}

fn page_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/view/:title", get(pages::view))
        .route("/edit/:title", get(pages::edit))
        .route("/save/:title", post(pages::save))
        // Grammar check and session gate, in that order, before any handler
        .layer(middleware::from_fn_with_state(state, gate::page_gate))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    // Saving a page needs a writable directory, so the liveness check writes
    // (and removes) a probe file rather than trusting that the dir exists
    let pages_dir = &config::config().storage.pages_dir;
    let probe = pages_dir.join(format!(".health.{}.tmp", Uuid::new_v4()));

    match tokio::fs::write(&probe, b"ok").await {
        Ok(()) => {
            let _ = tokio::fs::remove_file(&probe).await;
            (
                axum::http::StatusCode::OK,
                axum::response::Json(json!({
                    "success": true,
                    "data": {
                        "status": "ok",
                        "timestamp": now,
                        "storage": "ok"
                    }
                })),
            )
        }
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "page storage unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "storage_error": e.to_string()
                }
            })),
        ),
    }
}
