//! Activity event store for the eventlog server.
//!
//! Events record that an actor did something to a repository: pushed
//! commits, published a release, or started watching it. Each event carries
//! a visibility flag that the global listing can filter on.
//!
//! # Layers
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | `store` | create, find, update and delete single events |
//! | `query` | ordered listings filtered by visibility, repo or actor |
//! | `event` | the record type and its five-key API view |
//! | `params` | lenient parsing of client-submitted fields |
//!
//! # Usage
//!
//! ```rust,ignore
//! use eventlog_events::{create_event, list_by_repo, EventParams};
//!
//! let params = EventParams {
//!     event_type: Some("PushEvent".into()),
//!     public: Some(true),
//!     repo_id: Some(1),
//!     actor_id: Some(2),
//! };
//! let event = create_event(&conn, &params)?;
//! let for_repo = list_by_repo(&conn, 1)?;
//! ```

mod error;
mod event;
mod params;
mod query;
mod store;

pub use error::EventError;
pub use event::{Event, EventView, NewEvent, NOT_IN_LIST};
pub use params::EventParams;
pub use query::{
    list_all, list_by_actor, list_by_repo, list_events, list_private, list_public, EventFilter,
};
pub use store::{create_event, delete_event, get_event, insert_event, update_event};
