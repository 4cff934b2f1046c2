//! Event record, insertable record, and serialized view types.

use eventlog_types::{EventType, FieldErrors};
use serde::{Deserialize, Serialize};

use crate::params::EventParams;

/// Message attached to `event_type` when it is outside the allow-list.
pub const NOT_IN_LIST: &str = "is not included in the list";

/// A persisted activity event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Store-assigned id, ascending in creation order.
    pub id: i64,
    /// Kind of activity.
    pub event_type: EventType,
    /// Visibility flag. `None` matches neither the public nor the private filter.
    pub public: Option<bool>,
    /// Repository the activity happened in.
    pub repo_id: Option<i64>,
    /// User who performed the activity.
    pub actor_id: Option<i64>,
    /// Creation timestamp (RFC 3339, UTC).
    pub created_at: String,
    /// Last modification timestamp (RFC 3339, UTC).
    pub updated_at: String,
}

impl Event {
    /// Returns the canonical API representation of this event.
    pub fn view(&self) -> EventView {
        EventView::from(self)
    }
}

/// The JSON shape of an event returned by the API.
///
/// Exactly five keys, in this order. Timestamps are never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventView {
    pub id: i64,
    pub event_type: EventType,
    pub public: Option<bool>,
    pub repo_id: Option<i64>,
    pub actor_id: Option<i64>,
}

impl From<&Event> for EventView {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            event_type: event.event_type,
            public: event.public,
            repo_id: event.repo_id,
            actor_id: event.actor_id,
        }
    }
}

/// A validated event ready to be written.
///
/// Only obtainable through [`NewEvent::validate`], so a `NewEvent` always
/// carries an allow-listed `event_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewEvent {
    pub event_type: EventType,
    pub public: Option<bool>,
    pub repo_id: Option<i64>,
    pub actor_id: Option<i64>,
}

impl NewEvent {
    /// Validates raw parameters into an insertable record.
    ///
    /// # Errors
    ///
    /// Returns the field errors if `event_type` is missing or not one of the
    /// accepted values.
    pub fn validate(params: &EventParams) -> Result<Self, FieldErrors> {
        let event_type = params
            .event_type
            .as_deref()
            .and_then(|raw| raw.parse::<EventType>().ok());

        match event_type {
            Some(event_type) => Ok(Self {
                event_type,
                public: params.public,
                repo_id: params.repo_id,
                actor_id: params.actor_id,
            }),
            None => {
                let mut errors = FieldErrors::new();
                errors.add("event_type", NOT_IN_LIST);
                Err(errors)
            }
        }
    }

    /// Overlays `params` onto an existing event. Fields absent from
    /// `params` keep their stored values; the result is revalidated.
    ///
    /// # Errors
    ///
    /// Returns the field errors if the merged `event_type` is invalid.
    pub fn merge(existing: &Event, params: &EventParams) -> Result<Self, FieldErrors> {
        let merged = EventParams {
            event_type: params
                .event_type
                .clone()
                .or_else(|| Some(existing.event_type.as_str().to_string())),
            public: params.public.or(existing.public),
            repo_id: params.repo_id.or(existing.repo_id),
            actor_id: params.actor_id.or(existing.actor_id),
        };
        Self::validate(&merged)
    }
}
