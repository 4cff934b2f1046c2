//! Shared types for the eventlog workspace.
//!
//! This crate provides the foundational types used across all eventlog
//! crates: the closed set of recordable event types, the visibility filter
//! accepted by listing endpoints, and the field-level validation error map.
//!
//! No crate in the workspace depends on anything *except* `eventlog-types`
//! for cross-cutting type definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod validation;
pub use validation::FieldErrors;

/// Activity event types accepted by the event store.
///
/// The set is closed: any other string is rejected at the boundary before
/// a record can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Commits pushed to a repository.
    PushEvent,
    /// A release was published.
    ReleaseEvent,
    /// A repository was starred.
    WatchEvent,
}

impl EventType {
    /// Every accepted event type, in declaration order.
    pub const ALL: [EventType; 3] = [Self::PushEvent, Self::ReleaseEvent, Self::WatchEvent];

    /// Returns the canonical string label for this event type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PushEvent => "PushEvent",
            Self::ReleaseEvent => "ReleaseEvent",
            Self::WatchEvent => "WatchEvent",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = ParseEventTypeError;

    /// Parses an event type. Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PushEvent" => Ok(Self::PushEvent),
            "ReleaseEvent" => Ok(Self::ReleaseEvent),
            "WatchEvent" => Ok(Self::WatchEvent),
            _ => Err(ParseEventTypeError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown event type string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event type: {0}")]
pub struct ParseEventTypeError(pub String);

/// Public/private filter applied to the global event listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// No filter.
    #[default]
    All,
    /// Only events whose `public` flag is true.
    Public,
    /// Only events whose `public` flag is false.
    Private,
}

impl Visibility {
    /// Interprets the raw `public` query parameter.
    ///
    /// `"true"` selects public events and `"false"` selects private ones.
    /// Any other value, or no value at all, disables the filter.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some("true") => Self::Public,
            Some("false") => Self::Private,
            _ => Self::All,
        }
    }

    /// The value the `public` column must hold, or `None` for no filter.
    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Public => Some(true),
            Self::Private => Some(false),
        }
    }
}
