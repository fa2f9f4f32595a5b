//! Shared types for the actlog workspace.
//!
//! This crate provides the foundational types used across all actlog
//! crates: entity identifiers, the JSON object alias used for state
//! snapshots, the [`Loggable`] capability implemented by domain entities,
//! and the [`ActivityState`] record description produced by the builder.
//!
//! Crates in the workspace depend on `actlog-types` for cross-cutting type
//! definitions instead of on each other, which keeps the diff engine and the
//! morph map free of any dependency on the builder or the storage layer.

use serde::{Deserialize, Serialize};

mod loggable;
pub use loggable::{EntityType, Loggable};

/// A JSON object, used for `current`/`previous` snapshots and extra values.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Identifier of an actor or an entity referenced by an activity record.
///
/// Serialised untagged, so it reads and writes as a plain JSON string or
/// number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// A numeric primary key.
    Number(i64),
    /// A textual key (UUIDs, slugs, stringified ids).
    Text(String),
}

impl EntityId {
    /// Returns the JSON representation of this id.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Number(n) => serde_json::Value::from(*n),
            Self::Text(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Converts a JSON string or integer into an id.
    ///
    /// Returns `None` for any other JSON shape (floats, booleans, null,
    /// arrays, objects).
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Number(n) => n.as_i64().map(Self::Number),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for EntityId {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<u32> for EntityId {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// The record description assembled by the activity builder.
///
/// Every field except `extra` is optional; nothing is required to write a
/// record. `actor_type` and `entity_type` hold either a morph-map alias
/// (when the builder was given a typed entity) or the raw string passed by
/// the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityState {
    /// Log name, used to group records by channel (e.g. `"info"`).
    pub name: Option<String>,
    /// Free-form description supplied when the record is written.
    pub description: Option<String>,
    /// Identifier of the actor that performed the activity.
    pub actor_id: Option<EntityId>,
    /// Alias of the actor's type.
    pub actor_type: Option<String>,
    /// The event name (e.g. `"update"`).
    pub event: Option<String>,
    /// Identifier of the entity the activity was performed on.
    pub entity_id: Option<EntityId>,
    /// Alias of the entity's type.
    pub entity_type: Option<String>,
    /// Snapshot of the entity after the activity.
    pub current: Option<JsonObject>,
    /// Snapshot of the entity before the activity.
    pub previous: Option<JsonObject>,
    /// Caller-chosen batch identifier grouping related records.
    pub batch_id: Option<String>,
    /// Extra values merged in by the caller.
    #[serde(default)]
    pub extra: JsonObject,
}
