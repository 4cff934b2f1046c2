//! Events resource.
//!
//! - `GET /events` — every event, optionally filtered by `public`
//! - `GET /events/{id}` — one event
//! - `POST /events` — record an event
//! - `PATCH|PUT /events/{id}` — modify an event
//! - `DELETE /events/{id}` — remove an event

use crate::api::{parse_event_id, with_conn, ApiError, EventBody};
use crate::AppState;
use axum::{
    extract::{Extension, Path, Query},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use eventlog_events::{
    create_event, delete_event, get_event, list_events, update_event, EventFilter, EventView,
};
use eventlog_types::Visibility;
use std::sync::Arc;

/// Reads the `public` filter from the raw query pairs.
///
/// `"true"` selects public events only and `"false"` private only; anything
/// else lists every event. When the key repeats, the last value wins.
fn visibility_from_pairs(pairs: &[(String, String)]) -> Visibility {
    let public = pairs
        .iter()
        .rev()
        .find(|(key, _)| key == "public")
        .map(|(_, value)| value.as_str());
    Visibility::from_query(public)
}

/// GET /events
pub async fn list_events_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<EventView>>, ApiError> {
    let filter = EventFilter::visibility(visibility_from_pairs(&pairs));

    let events = with_conn(state, move |conn| {
        list_events(conn, &filter).map_err(ApiError::from)
    })
    .await?;

    Ok(Json(events.iter().map(|e| e.view()).collect()))
}

/// GET /events/{id}
pub async fn get_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EventView>, ApiError> {
    let id = parse_event_id(&id)?;
    let event = with_conn(state, move |conn| get_event(conn, id).map_err(ApiError::from)).await?;
    Ok(Json(event.view()))
}

/// POST /events
///
/// Responds 201 with the stored event and its location, or 400 with the
/// field errors if validation fails.
pub async fn create_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    EventBody(params): EventBody,
) -> Result<Response, ApiError> {
    let event = with_conn(state, move |conn| {
        create_event(conn, &params)
            .map_err(|e| ApiError::from_event_error(e, StatusCode::BAD_REQUEST))
    })
    .await?;

    let location = format!("/events/{}", event.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(event.view()),
    )
        .into_response())
}

/// PATCH /events/{id} and PUT /events/{id}
///
/// Fields missing from the body keep their stored values. Responds 422
/// with the field errors if the merged record is invalid.
pub async fn update_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    EventBody(params): EventBody,
) -> Result<Json<EventView>, ApiError> {
    let id = parse_event_id(&id)?;
    let event = with_conn(state, move |conn| {
        update_event(conn, id, &params)
            .map_err(|e| ApiError::from_event_error(e, StatusCode::UNPROCESSABLE_ENTITY))
    })
    .await?;

    Ok(Json(event.view()))
}

/// DELETE /events/{id}
pub async fn delete_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_event_id(&id)?;
    with_conn(state, move |conn| delete_event(conn, id).map_err(ApiError::from)).await?;
    Ok(StatusCode::NO_CONTENT)
}
