//! Wiring a configured logger over SQLite.

use actlog_core::ActivityLogger;
use actlog_db::{MigrationError, PoolError};
use actlog_morph::MorphMap;
use actlog_sqlite::SqliteActivityStore;
use thiserror::Error;

use crate::config::{Config, ConfigError};

/// Errors that can occur while bringing up the activity log.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    /// No connection was available to run migrations on.
    #[error("failed to get database connection for migrations: {0}")]
    Connection(#[from] r2d2::Error),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// The blocking setup task panicked.
    #[error("bootstrap task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Creates the pool, applies pending migrations and returns a logger
/// backed by [`SqliteActivityStore`].
///
/// `registry` must already contain every alias the application logs with;
/// it is read-only from here on.
///
/// # Errors
///
/// Returns `BootstrapError` if the pool cannot be created or a migration
/// fails.
pub async fn bootstrap(
    config: &Config,
    registry: MorphMap,
) -> Result<ActivityLogger<SqliteActivityStore>, BootstrapError> {
    let path = config.database.path.clone();
    let settings = config.database.runtime_settings();

    let pool = tokio::task::spawn_blocking(move || -> Result<_, BootstrapError> {
        let pool = actlog_db::create_pool(&path, settings)?;
        let conn = pool.get()?;
        let applied = actlog_db::run_migrations(&conn)?;
        if applied > 0 {
            tracing::info!(count = applied, "applied database migrations");
        }
        drop(conn);
        Ok(pool)
    })
    .await??;

    tracing::info!(
        path = %config.database.path,
        aliases = registry.len(),
        "activity log ready"
    );

    Ok(ActivityLogger::new(registry, SqliteActivityStore::new(pool)))
}
