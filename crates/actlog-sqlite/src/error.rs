//! Error types for the SQLite activity store.

/// Errors returned by [`SqliteActivityStore`](crate::SqliteActivityStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database operation failed.
    #[error("activity store database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No connection could be taken from the pool.
    #[error("activity store pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// A snapshot or extra values could not be (de)serialised.
    #[error("activity store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The blocking database task panicked or was cancelled.
    #[error("activity store task join error: {0}")]
    Join(String),

    /// A stored timestamp could not be parsed.
    #[error("invalid stored timestamp: {0}")]
    Timestamp(String),

    /// The transaction was already committed or rolled back.
    #[error("transaction is already finished")]
    TransactionClosed,

    /// A thread panicked while holding the transaction's connection.
    #[error("transaction connection lock poisoned")]
    LockPoisoned,
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Join(e.to_string())
    }
}
