//! SQLite plumbing for activity log storage.
//!
//! Provides the `r2d2` connection pool, WAL-mode initialisation, and the
//! embedded SQL migrations that create the `activity_logs` table. The store
//! itself lives in `actlog-sqlite`; this crate only owns the schema and the
//! connections.
//!
//! Migrations are compiled into the binary via `include_str!` and applied
//! once each, in order, so the schema always matches the code reading it.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError, MEMORY_PATH};
