//! The SQLite-backed activity store.
//!
//! Writes go through [`ActivityStore::create`], which inserts one row on a
//! pooled connection or on an explicit transaction. Reads go through
//! [`SqliteActivityStore::find`] and
//! [`SqliteActivityStore::query_activities`]. All SQLite work runs on the
//! blocking thread pool.

use actlog_core::{ActivityStore, StoredActivity};
use actlog_db::DbPool;
use actlog_types::{ActivityState, EntityId};
use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use rusqlite::{Connection, ToSql};

use crate::error::StoreError;
use crate::row::{self, RawRow, COLUMNS};
use crate::transaction::{lock, StoreTransaction, WriteOptions};

/// Filter criteria for [`SqliteActivityStore::query_activities`].
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    /// Filter by log name.
    pub name: Option<String>,
    /// Filter by event.
    pub event: Option<String>,
    /// Filter by batch id.
    pub batch_id: Option<String>,
    /// Filter by actor alias and id.
    pub actor: Option<(String, EntityId)>,
    /// Filter by entity alias and id.
    pub entity: Option<(String, EntityId)>,
    /// Maximum number of records to return (default: 100). Negative values
    /// return nothing.
    pub limit: Option<i64>,
}

impl ActivityFilter {
    /// Every record of one batch.
    pub fn batch(batch_id: impl Into<String>) -> Self {
        Self {
            batch_id: Some(batch_id.into()),
            ..Self::default()
        }
    }
}

/// Persists activity records in the `activity_logs` table.
///
/// The pool must point at a database on which
/// [`actlog_db::run_migrations`] has been run.
#[derive(Clone)]
pub struct SqliteActivityStore {
    pool: DbPool,
}

impl SqliteActivityStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Opens a transaction on a dedicated pooled connection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Pool`] if no connection is available or
    /// [`StoreError::Database`] if the transaction cannot be started.
    pub async fn begin(&self) -> Result<StoreTransaction, StoreError> {
        let pool = self.pool.clone();
        let conn = tokio::task::spawn_blocking(move || -> Result<_, StoreError> {
            let conn = pool.get()?;
            conn.execute_batch("BEGIN")?;
            Ok(conn)
        })
        .await??;

        tracing::debug!("activity transaction started");
        Ok(StoreTransaction::new(conn))
    }

    /// Returns the record with `id`, if any.
    pub async fn find(&self, id: i64) -> Result<Option<StoredActivity>, StoreError> {
        self.with_conn(move |conn| {
            let sql = format!("SELECT {COLUMNS} FROM activity_logs WHERE id = ?1");
            let raw = match conn.query_row(&sql, [id], RawRow::read) {
                Ok(raw) => raw,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            raw.into_activity().map(Some)
        })
        .await
    }

    /// Returns the records matching `filter`, oldest first.
    pub async fn query_activities(
        &self,
        filter: &ActivityFilter,
    ) -> Result<Vec<StoredActivity>, StoreError> {
        let filter = filter.clone();
        self.with_conn(move |conn| query(conn, &filter)).await
    }

    async fn with_conn<T, F>(&self, work: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            work(&*conn)
        })
        .await?
    }
}

#[async_trait]
impl ActivityStore for SqliteActivityStore {
    type Options = WriteOptions;
    type Record = StoredActivity;
    type Error = StoreError;

    async fn create(
        &self,
        state: ActivityState,
        options: WriteOptions,
    ) -> Result<StoredActivity, StoreError> {
        let in_transaction = options.in_transaction();
        // Stored timestamps carry microseconds; truncate so the returned
        // record equals what a later read yields.
        let now = Utc::now().trunc_subsecs(6);

        let record = match options.transaction {
            Some(shared) => {
                tokio::task::spawn_blocking(move || {
                    let guard = lock(&shared)?;
                    let conn = guard.as_ref().ok_or(StoreError::TransactionClosed)?;
                    row::insert(conn, state, now)
                })
                .await??
            }
            None => self.with_conn(move |conn| row::insert(conn, state, now)).await?,
        };

        tracing::debug!(id = record.id, in_transaction, "activity record stored");
        Ok(record)
    }
}

fn query(conn: &Connection, filter: &ActivityFilter) -> Result<Vec<StoredActivity>, StoreError> {
    // WHERE clauses and bind parameters are collected separately so nothing
    // is interpolated.
    let mut clauses: Vec<String> = Vec::new();
    let mut param_values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(ref name) = filter.name {
        bind(&mut clauses, &mut param_values, "name", Box::new(name.clone()));
    }
    if let Some(ref event) = filter.event {
        bind(&mut clauses, &mut param_values, "event", Box::new(event.clone()));
    }
    if let Some(ref batch_id) = filter.batch_id {
        bind(&mut clauses, &mut param_values, "batch_id", Box::new(batch_id.clone()));
    }
    if let Some((ref alias, ref id)) = filter.actor {
        bind(&mut clauses, &mut param_values, "actor_type", Box::new(alias.clone()));
        bind(&mut clauses, &mut param_values, "actor_id", Box::new(row::id_value(id)));
    }
    if let Some((ref alias, ref id)) = filter.entity {
        bind(&mut clauses, &mut param_values, "entity_type", Box::new(alias.clone()));
        bind(&mut clauses, &mut param_values, "entity_id", Box::new(row::id_value(id)));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    // SQLite treats a negative LIMIT as unbounded.
    param_values.push(Box::new(filter.limit.unwrap_or(100).max(0)));
    let sql = format!(
        "SELECT {COLUMNS}
         FROM activity_logs
         {where_clause}
         ORDER BY id ASC
         LIMIT ?{}",
        param_values.len()
    );

    let params_refs: Vec<&dyn ToSql> = param_values.iter().map(|p| &**p).collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_refs.as_slice(), RawRow::read)?;

    let mut activities = Vec::new();
    for raw in rows {
        activities.push(raw?.into_activity()?);
    }
    Ok(activities)
}

fn bind(
    clauses: &mut Vec<String>,
    param_values: &mut Vec<Box<dyn ToSql>>,
    column: &str,
    value: Box<dyn ToSql>,
) {
    param_values.push(value);
    clauses.push(format!("{column} = ?{}", param_values.len()));
}
