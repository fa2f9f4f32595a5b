//! An in-process store, for tests and for embedding without a database.

use std::sync::{Mutex, MutexGuard};

use actlog_types::ActivityState;
use async_trait::async_trait;
use chrono::Utc;

use crate::store::{ActivityStore, StoredActivity};

/// Errors returned by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryStoreError {
    /// A writer panicked while holding the lock.
    #[error("memory store lock poisoned")]
    Poisoned,

    /// The write was rejected by [`MemoryStore::fail_next`].
    #[error("write rejected: {0}")]
    Rejected(String),
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    records: Vec<StoredActivity>,
    fail_next: Option<String>,
}

/// Keeps every written record in memory, assigning ids from 1.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next write fail with [`MemoryStoreError::Rejected`].
    pub fn fail_next(&self, reason: impl Into<String>) -> Result<(), MemoryStoreError> {
        self.lock()?.fail_next = Some(reason.into());
        Ok(())
    }

    /// All records in write order.
    pub fn records(&self) -> Result<Vec<StoredActivity>, MemoryStoreError> {
        Ok(self.lock()?.records.clone())
    }

    /// The record with `id`, if any.
    pub fn find(&self, id: i64) -> Result<Option<StoredActivity>, MemoryStoreError> {
        Ok(self.lock()?.records.iter().find(|r| r.id == id).cloned())
    }

    /// Records sharing `batch_id`, in write order.
    pub fn by_batch(&self, batch_id: &str) -> Result<Vec<StoredActivity>, MemoryStoreError> {
        Ok(self
            .lock()?
            .records
            .iter()
            .filter(|r| r.batch_id() == Some(batch_id))
            .cloned()
            .collect())
    }

    /// Number of records written.
    pub fn len(&self) -> Result<usize, MemoryStoreError> {
        Ok(self.lock()?.records.len())
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> Result<bool, MemoryStoreError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, MemoryStoreError> {
        self.inner.lock().map_err(|_| MemoryStoreError::Poisoned)
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    type Options = ();
    type Record = StoredActivity;
    type Error = MemoryStoreError;

    async fn create(&self, state: ActivityState, _options: ()) -> Result<StoredActivity, Self::Error> {
        let mut inner = self.lock()?;
        if let Some(reason) = inner.fail_next.take() {
            return Err(MemoryStoreError::Rejected(reason));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let record = StoredActivity {
            id: inner.next_id,
            state,
            created_at: now,
            updated_at: now,
        };
        inner.records.push(record.clone());
        Ok(record)
    }
}
