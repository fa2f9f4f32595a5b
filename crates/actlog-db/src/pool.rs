//! Connection pool creation and configuration.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

/// Path that selects an in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Runtime tunables for SQLite connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// Busy timeout for SQLite connections, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections. Ignored for
    /// in-memory databases.
    pub pool_max_size: u32,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

/// The SQLite connection pool shared by the store.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Errors that can occur when creating the database pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Failed to build the connection pool.
    #[error("failed to create database connection pool: {0}")]
    PoolInit(#[from] r2d2::Error),
}

/// Creates the pool the activity store reads and writes through.
///
/// A file database gets up to `settings.pool_max_size` connections in WAL
/// mode, so readers never wait on the single writer.
///
/// [`MEMORY_PATH`] gets exactly one connection: every SQLite connection to
/// `:memory:` opens its own private database, and the migrated schema must
/// be the one later reads and writes see. That connection is never
/// recycled. With one connection, an open store transaction holds the
/// whole pool until it finishes.
///
/// # Errors
///
/// Returns `PoolError::PoolInit` if the connection pool cannot be created.
pub fn create_pool(db_path: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    let in_memory = db_path == MEMORY_PATH;
    let (manager, max_size) = if in_memory {
        (SqliteConnectionManager::memory(), 1)
    } else {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
        (
            SqliteConnectionManager::file(db_path).with_flags(flags),
            settings.pool_max_size,
        )
    };

    let manager = manager.with_init(move |conn| init_connection(conn, settings.busy_timeout_ms));
    let mut builder = Pool::builder().max_size(max_size);
    if in_memory {
        // Closing the only connection would discard the database.
        builder = builder.max_lifetime(None).idle_timeout(None);
    }
    let pool = builder.build(manager)?;

    tracing::debug!(path = db_path, max_size, "database pool created");
    Ok(pool)
}

/// Per-connection setup: WAL journaling (in-memory databases keep their
/// `memory` journal) and the busy timeout concurrent writers wait on.
fn init_connection(conn: &mut Connection, busy_timeout_ms: u64) -> rusqlite::Result<()> {
    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    if !matches!(journal_mode.as_str(), "wal" | "memory") {
        return Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
            Some(format!("activity database refused WAL mode: {journal_mode}")),
        ));
    }
    conn.execute_batch(&format!("PRAGMA busy_timeout = {busy_timeout_ms};"))
}
