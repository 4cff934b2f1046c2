//! Repos resource: events recorded against one repository.

use crate::api::{with_conn, ApiError};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    Json,
};
use eventlog_events::{list_by_repo, EventView};
use std::sync::Arc;

/// GET /repos/{repo_id}/events
///
/// Lists every event for the repository in creation order. The `public`
/// filter is not applied here; callers wanting it use `GET /events`.
pub async fn list_repo_events_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(repo_id): Path<i64>,
) -> Result<Json<Vec<EventView>>, ApiError> {
    let events = with_conn(state, move |conn| {
        list_by_repo(conn, repo_id).map_err(ApiError::from)
    })
    .await?;

    tracing::debug!(repo_id, count = events.len(), "listed repo events");
    Ok(Json(events.iter().map(|e| e.view()).collect()))
}
