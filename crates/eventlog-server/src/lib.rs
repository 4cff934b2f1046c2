//! eventlog server library logic.

pub mod api;
pub mod api_events;
pub mod api_repos;
pub mod api_users;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Extension, Json, Router,
};
use eventlog_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Maximum request body size (64 KiB). Event payloads are a handful of scalars.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/events",
            get(api_events::list_events_handler).post(api_events::create_event_handler),
        )
        .route(
            "/events/{id}",
            get(api_events::get_event_handler)
                .patch(api_events::update_event_handler)
                .put(api_events::update_event_handler)
                .delete(api_events::delete_event_handler),
        )
        .route(
            "/repos/{repo_id}/events",
            get(api_repos::list_repo_events_handler),
        )
        .route(
            "/users/{user_id}/events",
            get(api_users::list_user_events_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
