//! Caller-managed transactions for grouping activity writes.

use std::sync::{Arc, Mutex, MutexGuard};

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;

use crate::error::StoreError;

pub(crate) type PooledConn = PooledConnection<SqliteConnectionManager>;

/// A pooled connection with an open transaction. `None` once finished.
pub(crate) type SharedConn = Arc<Mutex<Option<PooledConn>>>;

pub(crate) fn lock(conn: &SharedConn) -> Result<MutexGuard<'_, Option<PooledConn>>, StoreError> {
    conn.lock().map_err(|_| StoreError::LockPoisoned)
}

/// Write options for [`SqliteActivityStore`](crate::SqliteActivityStore),
/// passed through `ActivityBuilder::query_options`.
///
/// The default writes each record on its own pooled connection in
/// autocommit mode.
#[derive(Clone, Default)]
pub struct WriteOptions {
    pub(crate) transaction: Option<SharedConn>,
}

impl WriteOptions {
    /// Whether writes go through an explicit transaction.
    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }
}

impl std::fmt::Debug for WriteOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteOptions")
            .field("in_transaction", &self.in_transaction())
            .finish()
    }
}

/// An open transaction started by
/// [`SqliteActivityStore::begin`](crate::SqliteActivityStore::begin).
///
/// Records written with [`options`](Self::options) become visible to other
/// connections only after [`commit`](Self::commit). Dropping the
/// transaction without finishing it rolls it back.
pub struct StoreTransaction {
    conn: SharedConn,
}

impl StoreTransaction {
    pub(crate) fn new(conn: PooledConn) -> Self {
        Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        }
    }

    /// Write options bound to this transaction.
    pub fn options(&self) -> WriteOptions {
        WriteOptions {
            transaction: Some(Arc::clone(&self.conn)),
        }
    }

    /// Commits every record written through this transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the commit fails; the
    /// transaction is rolled back in that case.
    pub async fn commit(self) -> Result<(), StoreError> {
        self.finish("COMMIT").await
    }

    /// Discards every record written through this transaction.
    pub async fn rollback(self) -> Result<(), StoreError> {
        self.finish("ROLLBACK").await
    }

    async fn finish(&self, statement: &'static str) -> Result<(), StoreError> {
        let shared = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = lock(&shared)?.take().ok_or(StoreError::TransactionClosed)?;
            if let Err(e) = conn.execute_batch(statement) {
                if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                    tracing::warn!(error = %rollback, "failed to roll back after {statement} error");
                }
                return Err(e.into());
            }
            tracing::debug!(statement, "activity transaction finished");
            Ok(())
        })
        .await?
    }
}

impl Drop for StoreTransaction {
    /// Rolls back an unfinished transaction. Inside a tokio runtime the
    /// `ROLLBACK` runs on the blocking pool and the connection returns to
    /// the pool once it completes; outside one it runs on the dropping
    /// thread.
    fn drop(&mut self) {
        let Ok(mut guard) = self.conn.lock() else {
            return;
        };
        let Some(conn) = guard.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || roll_back_abandoned(conn));
            }
            Err(_) => roll_back_abandoned(conn),
        }
    }
}

fn roll_back_abandoned(conn: PooledConn) {
    match conn.execute_batch("ROLLBACK") {
        Ok(()) => tracing::debug!("rolled back unfinished activity transaction"),
        Err(e) => tracing::warn!(error = %e, "failed to roll back unfinished activity transaction"),
    }
}
