//! Database layer for the eventlog server.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! and embedded SQL migrations. The `events` table and its constraints are
//! created through versioned migrations managed by this crate.
//!
//! Migrations are SQL files compiled into the binary via `include_str!`, so
//! the schema always ships with the code that queries it.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
