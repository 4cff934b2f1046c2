#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    response::Response,
    Router,
};
use eventlog_db::{create_pool, run_migrations, DbRuntimeSettings};
use eventlog_server::{app, AppState};
use serde_json::Value;
use tower::ServiceExt; // for oneshot

/// Builds the router over a fresh, migrated in-memory database.
pub fn setup_app() -> Router {
    let pool = create_pool(":memory:", DbRuntimeSettings::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        run_migrations(&conn).unwrap();
    }
    app(AppState { pool })
}

/// Builds the router over a migrated database file with a multi-connection
/// pool. The returned directory must outlive the router.
pub fn setup_file_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db");
    let pool = create_pool(path.to_str().unwrap(), DbRuntimeSettings::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        run_migrations(&conn).unwrap();
    }
    (app(AppState { pool }), dir)
}

pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: String,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header(CONTENT_TYPE, ct);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

/// Sends a request with an optional JSON body and decodes the JSON reply.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = match body {
        Some(json) => {
            send_raw(app, method, uri, Some("application/json"), json.to_string()).await
        }
        None => send_raw(app, method, uri, None, String::new()).await,
    };
    let status = response.status();
    (status, body_json(response).await)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

/// Creates an event and asserts it was accepted.
pub async fn create(app: &Router, body: Value) -> Value {
    let (status, json) = send(app, Method::POST, "/events", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "cannot create an event: {json}");
    json
}
