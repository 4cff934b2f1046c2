//! Users resource: events performed by one actor.

use crate::api::{with_conn, ApiError};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    Json,
};
use eventlog_events::{list_by_actor, EventView};
use std::sync::Arc;

/// GET /users/{user_id}/events
///
/// Lists every event whose `actor_id` is `user_id`, in creation order,
/// regardless of visibility.
pub async fn list_user_events_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<EventView>>, ApiError> {
    let events = with_conn(state, move |conn| {
        list_by_actor(conn, user_id).map_err(ApiError::from)
    })
    .await?;

    tracing::debug!(user_id, count = events.len(), "listed user events");
    Ok(Json(events.iter().map(|e| e.view()).collect()))
}
