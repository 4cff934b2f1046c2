//! Filtered listings over the `events` table.
//!
//! Every listing is ordered ascending by id, which is also creation order.

use eventlog_types::Visibility;
use rusqlite::Connection;

use crate::error::EventError;
use crate::event::Event;
use crate::store::{map_row_to_event, EVENT_COLUMNS};

/// Filter criteria for listing events. The default matches every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Restrict by the `public` flag.
    pub visibility: Visibility,
    /// Restrict to one repository.
    pub repo_id: Option<i64>,
    /// Restrict to one actor.
    pub actor_id: Option<i64>,
}

impl EventFilter {
    /// Matches events with the given visibility.
    pub fn visibility(visibility: Visibility) -> Self {
        Self {
            visibility,
            ..Self::default()
        }
    }

    /// Matches events in one repository, regardless of visibility.
    pub fn repo(repo_id: i64) -> Self {
        Self {
            repo_id: Some(repo_id),
            ..Self::default()
        }
    }

    /// Matches events by one actor, regardless of visibility.
    pub fn actor(actor_id: i64) -> Self {
        Self {
            actor_id: Some(actor_id),
            ..Self::default()
        }
    }
}

/// Lists events matching `filter`, ordered by ascending id.
///
/// # Errors
///
/// Returns `EventError::Database` on SQL failure.
pub fn list_events(conn: &Connection, filter: &EventFilter) -> Result<Vec<Event>, EventError> {
    // Clauses and bind parameters are collected separately so nothing is
    // interpolated into the SQL text.
    let mut clauses: Vec<String> = Vec::new();
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    let mut idx = 1u32;

    if let Some(flag) = filter.visibility.as_flag() {
        clauses.push(format!("public = ?{idx}"));
        param_values.push(Box::new(flag));
        idx += 1;
    }

    if let Some(repo_id) = filter.repo_id {
        clauses.push(format!("repo_id = ?{idx}"));
        param_values.push(Box::new(repo_id));
        idx += 1;
    }

    if let Some(actor_id) = filter.actor_id {
        clauses.push(format!("actor_id = ?{idx}"));
        param_values.push(Box::new(actor_id));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events {where_clause} ORDER BY id ASC");

    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(|p| &**p).collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_refs.as_slice(), map_row_to_event)?;

    let mut events = Vec::new();
    for row in rows {
        events.push(row?);
    }
    Ok(events)
}

/// Every event.
pub fn list_all(conn: &Connection) -> Result<Vec<Event>, EventError> {
    list_events(conn, &EventFilter::default())
}

/// Events whose `public` flag is true.
pub fn list_public(conn: &Connection) -> Result<Vec<Event>, EventError> {
    list_events(conn, &EventFilter::visibility(Visibility::Public))
}

/// Events whose `public` flag is false.
pub fn list_private(conn: &Connection) -> Result<Vec<Event>, EventError> {
    list_events(conn, &EventFilter::visibility(Visibility::Private))
}

/// Events recorded against `repo_id`.
pub fn list_by_repo(conn: &Connection, repo_id: i64) -> Result<Vec<Event>, EventError> {
    list_events(conn, &EventFilter::repo(repo_id))
}

/// Events performed by `actor_id`.
pub fn list_by_actor(conn: &Connection, actor_id: i64) -> Result<Vec<Event>, EventError> {
    list_events(conn, &EventFilter::actor(actor_id))
}
