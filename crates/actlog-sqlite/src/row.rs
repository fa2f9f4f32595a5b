//! Conversions between activity records and `activity_logs` rows.

use actlog_core::StoredActivity;
use actlog_types::{ActivityState, EntityId, JsonObject};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, Value, ValueRef};
use rusqlite::{params, Connection, Row};

use crate::error::StoreError;

/// Column list shared by every `SELECT` on `activity_logs`, in the order
/// [`RawRow::read`] expects.
pub(crate) const COLUMNS: &str = "id, name, description, actor_type, actor_id, event, \
     entity_type, entity_id, current_json, previous_json, batch_id, extra_json, \
     created_at, updated_at";

/// Binds an [`EntityId`] with its own storage class, so integers and text
/// stay distinguishable in the untyped id columns.
pub(crate) fn id_value(id: &EntityId) -> Value {
    match id {
        EntityId::Number(n) => Value::Integer(*n),
        EntityId::Text(s) => Value::Text(s.clone()),
    }
}

struct StoredId(EntityId);

impl FromSql for StoredId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(n) => Ok(Self(EntityId::Number(n))),
            ValueRef::Text(_) => value.as_str().map(|s| Self(EntityId::Text(s.to_string()))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// A row as read from SQLite, before JSON and timestamp decoding.
pub(crate) struct RawRow {
    id: i64,
    name: Option<String>,
    description: Option<String>,
    actor_type: Option<String>,
    actor_id: Option<StoredId>,
    event: Option<String>,
    entity_type: Option<String>,
    entity_id: Option<StoredId>,
    current_json: Option<String>,
    previous_json: Option<String>,
    batch_id: Option<String>,
    extra_json: String,
    created_at: String,
    updated_at: String,
}

impl RawRow {
    pub(crate) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            actor_type: row.get(3)?,
            actor_id: row.get(4)?,
            event: row.get(5)?,
            entity_type: row.get(6)?,
            entity_id: row.get(7)?,
            current_json: row.get(8)?,
            previous_json: row.get(9)?,
            batch_id: row.get(10)?,
            extra_json: row.get(11)?,
            created_at: row.get(12)?,
            updated_at: row.get(13)?,
        })
    }

    pub(crate) fn into_activity(self) -> Result<StoredActivity, StoreError> {
        Ok(StoredActivity {
            id: self.id,
            state: ActivityState {
                name: self.name,
                description: self.description,
                actor_id: self.actor_id.map(|id| id.0),
                actor_type: self.actor_type,
                event: self.event,
                entity_id: self.entity_id.map(|id| id.0),
                entity_type: self.entity_type,
                current: decode_object(self.current_json)?,
                previous: decode_object(self.previous_json)?,
                batch_id: self.batch_id,
                extra: serde_json::from_str(&self.extra_json)?,
            },
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// Inserts one record and returns it with its assigned id.
pub(crate) fn insert(
    conn: &Connection,
    state: ActivityState,
    now: DateTime<Utc>,
) -> Result<StoredActivity, StoreError> {
    let current_json = encode_object(state.current.as_ref())?;
    let previous_json = encode_object(state.previous.as_ref())?;
    let extra_json = serde_json::to_string(&state.extra)?;
    let stamp = format_timestamp(now);

    let id: i64 = conn.query_row(
        "INSERT INTO activity_logs
            (name, description, actor_type, actor_id, event, entity_type, entity_id,
             current_json, previous_json, batch_id, extra_json, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
         RETURNING id",
        params![
            state.name,
            state.description,
            state.actor_type,
            state.actor_id.as_ref().map(id_value),
            state.event,
            state.entity_type,
            state.entity_id.as_ref().map(id_value),
            current_json,
            previous_json,
            state.batch_id,
            extra_json,
            stamp,
        ],
        |row| row.get(0),
    )?;

    Ok(StoredActivity {
        id,
        state,
        created_at: now,
        updated_at: now,
    })
}

fn encode_object(object: Option<&JsonObject>) -> Result<Option<String>, StoreError> {
    Ok(object.map(serde_json::to_string).transpose()?)
}

fn decode_object(raw: Option<String>) -> Result<Option<JsonObject>, StoreError> {
    Ok(raw.as_deref().map(serde_json::from_str).transpose()?)
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StoreError::Timestamp(format!("{raw}: {e}")))
}
