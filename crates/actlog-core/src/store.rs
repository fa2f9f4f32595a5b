//! The persistence port and the stored record it returns.

use actlog_diff::{ChangeSet, Patch};
use actlog_types::{ActivityState, EntityId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persistence for finished activity records.
///
/// The builder hands every record to [`create`](ActivityStore::create)
/// exactly once, together with the options set through
/// `ActivityBuilder::query_options`. Whatever the store returns, including
/// its errors, is passed back to the caller unchanged.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Store-specific write options (e.g. a transaction to write through).
    type Options: Default + Send;

    /// The persisted record handle.
    type Record: StoredRecord + Send;

    /// The store's error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persists one record.
    async fn create(
        &self,
        state: ActivityState,
        options: Self::Options,
    ) -> Result<Self::Record, Self::Error>;
}

/// A persisted record that can report what changed between its snapshots.
pub trait StoredRecord {
    /// The record's fields as they were written.
    fn state(&self) -> &ActivityState;

    /// Old/new pairs for every leaf that differs between `previous` and
    /// `current`.
    fn changes(&self) -> ChangeSet {
        let state = self.state();
        actlog_diff::changes(state.previous.as_ref(), state.current.as_ref())
    }

    /// New values for every leaf that differs between `previous` and
    /// `current`.
    fn diff(&self) -> Patch {
        let state = self.state();
        actlog_diff::patch(state.previous.as_ref(), state.current.as_ref())
    }
}

/// An activity record together with its storage-assigned identity and
/// timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredActivity {
    /// Storage-assigned id.
    pub id: i64,
    /// The record's fields.
    #[serde(flatten)]
    pub state: ActivityState,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

impl StoredActivity {
    /// The log name.
    pub fn name(&self) -> Option<&str> {
        self.state.name.as_deref()
    }

    /// The description.
    pub fn description(&self) -> Option<&str> {
        self.state.description.as_deref()
    }

    /// The event name.
    pub fn event(&self) -> Option<&str> {
        self.state.event.as_deref()
    }

    /// The actor's id.
    pub fn actor_id(&self) -> Option<&EntityId> {
        self.state.actor_id.as_ref()
    }

    /// The actor's type alias.
    pub fn actor_type(&self) -> Option<&str> {
        self.state.actor_type.as_deref()
    }

    /// The id of the entity acted on.
    pub fn entity_id(&self) -> Option<&EntityId> {
        self.state.entity_id.as_ref()
    }

    /// The type alias of the entity acted on.
    pub fn entity_type(&self) -> Option<&str> {
        self.state.entity_type.as_deref()
    }

    /// The batch id shared by related records.
    pub fn batch_id(&self) -> Option<&str> {
        self.state.batch_id.as_deref()
    }
}

impl StoredRecord for StoredActivity {
    fn state(&self) -> &ActivityState {
        &self.state
    }
}
