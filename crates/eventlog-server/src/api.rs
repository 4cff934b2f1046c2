//! Shared API plumbing: the error type, request body extraction, and the
//! blocking database bridge used by every handler.

use crate::AppState;
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use eventlog_events::{EventError, EventParams};
use eventlog_types::FieldErrors;
use std::sync::Arc;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Field validation failed. The body is the field error map itself.
    #[error("validation failed: {errors}")]
    Validation {
        status: StatusCode,
        errors: FieldErrors,
    },
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl ApiError {
    /// Maps a store error, reporting validation failures with `status`.
    ///
    /// Create reports them as 400 and update as 422.
    pub fn from_event_error(e: EventError, validation_status: StatusCode) -> Self {
        match e {
            EventError::NotFound(_) => ApiError::NotFound(e.to_string()),
            EventError::Validation(errors) => ApiError::Validation {
                status: validation_status,
                errors,
            },
            EventError::Database(ref err) => {
                tracing::error!(error = %err, "event store operation failed");
                ApiError::InternalServerError(e.to_string())
            }
        }
    }
}

impl From<EventError> for ApiError {
    fn from(e: EventError) -> Self {
        ApiError::from_event_error(e, StatusCode::UNPROCESSABLE_ENTITY)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Validation { status, errors } => {
                return (status, Json(errors)).into_response();
            }
            ApiError::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Runs `f` with a pooled connection on the blocking thread pool.
pub(crate) async fn with_conn<T, F>(state: Arc<AppState>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Connection) -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection");
            ApiError::InternalServerError(format!("db connection failed: {}", e))
        })?;
        f(&conn)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "blocking task join error");
        ApiError::InternalServerError(format!("task join error: {}", e))
    })?
}

/// Parses an event id path segment.
///
/// A segment that is not an `i64` cannot name a stored event, so it is
/// reported as not found rather than as a malformed request.
pub(crate) fn parse_event_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("event not found: {raw}")))
}

/// Body encodings accepted for event writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFormat {
    Json,
    Form,
    Multipart,
}

impl BodyFormat {
    /// Picks the decoder for a `Content-Type` value. A missing header
    /// is read as JSON.
    fn from_content_type(content_type: Option<&str>) -> Option<Self> {
        let Some(content_type) = content_type else {
            return Some(Self::Json);
        };
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/x-www-form-urlencoded" => Some(Self::Form),
            "multipart/form-data" => Some(Self::Multipart),
            "application/json" => Some(Self::Json),
            other if other.starts_with("application/") && other.ends_with("+json") => {
                Some(Self::Json)
            }
            _ => None,
        }
    }
}

/// Event fields from a JSON, form-encoded or multipart request body.
///
/// An empty body yields empty parameters, which then fail validation
/// (on create) or change nothing (on update). Any other content type is
/// rejected with 415.
#[derive(Debug)]
pub struct EventBody(pub EventParams);

impl<S> FromRequest<S> for EventBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| value.to_str().unwrap_or_default().to_owned());

        let format = BodyFormat::from_content_type(content_type.as_deref()).ok_or_else(|| {
            ApiError::UnsupportedMediaType(format!(
                "expected application/json, application/x-www-form-urlencoded or multipart/form-data, got {}",
                content_type.as_deref().unwrap_or_default()
            ))
        })?;

        if format == BodyFormat::Multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            return read_multipart(multipart).await.map(Self);
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        if bytes.is_empty() {
            return Ok(Self(EventParams::default()));
        }

        let params = match format {
            BodyFormat::Form => serde_urlencoded::from_bytes(&bytes)
                .map_err(|e| ApiError::BadRequest(format!("malformed form body: {}", e)))?,
            _ => serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::BadRequest(format!("malformed json body: {}", e)))?,
        };

        Ok(Self(params))
    }
}

/// Collects named multipart text fields into event parameters.
///
/// Values arrive as strings, as they do from a urlencoded form, and go
/// through the same lenient coercion. A repeated field keeps its last value.
async fn read_multipart(mut multipart: Multipart) -> Result<EventParams, ApiError> {
    let mut fields = serde_json::Map::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))?;
        fields.insert(name, serde_json::Value::String(value));
    }

    serde_json::from_value(serde_json::Value::Object(fields))
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))
}
