//! Persistence operations for the `events` table.
//!
//! Writes go through [`create_event`] and [`update_event`], which validate
//! the submitted fields before touching the table. A rejected write leaves
//! persisted state unchanged. Ids are assigned by the table's
//! `AUTOINCREMENT` key, never by the caller.

use chrono::{SecondsFormat, Utc};
use eventlog_types::EventType;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

use crate::error::EventError;
use crate::event::{Event, NewEvent};
use crate::params::EventParams;

pub(crate) const EVENT_COLUMNS: &str =
    "id, event_type, public, repo_id, actor_id, created_at, updated_at";

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Validates `params` and inserts a new event.
///
/// # Errors
///
/// Returns `EventError::Validation` if `event_type` is not allow-listed, or
/// `EventError::Database` on SQL failure.
pub fn create_event(conn: &Connection, params: &EventParams) -> Result<Event, EventError> {
    let new_event = NewEvent::validate(params).map_err(|errors| {
        tracing::debug!(%errors, "rejected event create");
        EventError::Validation(errors)
    })?;
    insert_event(conn, &new_event)
}

/// Inserts an already-validated event and returns the stored record.
///
/// # Errors
///
/// Returns `EventError::Database` on SQL failure.
pub fn insert_event(conn: &Connection, new_event: &NewEvent) -> Result<Event, EventError> {
    let timestamp = now();
    let id: i64 = conn.query_row(
        "INSERT INTO events (event_type, public, repo_id, actor_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)
         RETURNING id",
        params![
            new_event.event_type.as_str(),
            new_event.public,
            new_event.repo_id,
            new_event.actor_id,
            timestamp,
        ],
        |row| row.get(0),
    )?;

    tracing::info!(
        event_id = id,
        event_type = new_event.event_type.as_str(),
        "event created"
    );

    Ok(Event {
        id,
        event_type: new_event.event_type,
        public: new_event.public,
        repo_id: new_event.repo_id,
        actor_id: new_event.actor_id,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    })
}

/// Looks up a single event by id.
///
/// # Errors
///
/// Returns `EventError::NotFound` if no event has this id.
pub fn get_event(conn: &Connection, id: i64) -> Result<Event, EventError> {
    conn.query_row(
        &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
        [id],
        map_row_to_event,
    )
    .optional()?
    .ok_or(EventError::NotFound(id))
}

/// Merges `params` into the stored event and writes the result.
///
/// The read, revalidation and write happen inside one IMMEDIATE
/// transaction. The write lock is taken before the read, so overlapping
/// updates queue on the busy timeout instead of failing to upgrade a
/// stale read snapshot.
///
/// # Errors
///
/// Returns `EventError::NotFound` if the event does not exist and
/// `EventError::Validation` if the merged record is invalid. In both
/// cases the stored record is unchanged.
pub fn update_event(conn: &Connection, id: i64, params: &EventParams) -> Result<Event, EventError> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let existing = get_event(&tx, id)?;
    let merged = NewEvent::merge(&existing, params).map_err(|errors| {
        tracing::debug!(event_id = id, %errors, "rejected event update");
        EventError::Validation(errors)
    })?;

    let timestamp = now();
    tx.execute(
        "UPDATE events
         SET event_type = ?1, public = ?2, repo_id = ?3, actor_id = ?4, updated_at = ?5
         WHERE id = ?6",
        params![
            merged.event_type.as_str(),
            merged.public,
            merged.repo_id,
            merged.actor_id,
            timestamp,
            id,
        ],
    )?;
    tx.commit()?;

    tracing::info!(event_id = id, "event updated");

    Ok(Event {
        id,
        event_type: merged.event_type,
        public: merged.public,
        repo_id: merged.repo_id,
        actor_id: merged.actor_id,
        created_at: existing.created_at,
        updated_at: timestamp,
    })
}

/// Permanently removes an event.
///
/// # Errors
///
/// Returns `EventError::NotFound` if no event has this id.
pub fn delete_event(conn: &Connection, id: i64) -> Result<(), EventError> {
    let removed = conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(EventError::NotFound(id));
    }
    tracing::info!(event_id = id, "event deleted");
    Ok(())
}

/// Maps a row selected with [`EVENT_COLUMNS`] to an [`Event`].
pub(crate) fn map_row_to_event(row: &Row) -> rusqlite::Result<Event> {
    let raw_type: String = row.get(1)?;
    let event_type = raw_type.parse::<EventType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Event {
        id: row.get(0)?,
        event_type,
        public: row.get(2)?,
        repo_id: row.get(3)?,
        actor_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
