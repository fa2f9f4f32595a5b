//! The two accepted shapes of an actor or subject reference.

use actlog_types::{EntityId, Loggable};
use serde_json::Value;

use crate::error::ActivityError;

/// An actor or entity reference passed to `by` / `on`.
///
/// Either a raw `(alias, id)` pair stored as given, or a typed entity whose
/// alias is resolved through the morph map and whose id comes from
/// [`Loggable::log_id`].
#[derive(Clone)]
pub enum SubjectRef<'a> {
    /// A raw alias and id.
    ById {
        /// The type alias, stored verbatim.
        alias: String,
        /// The entity id.
        id: EntityId,
    },
    /// A typed entity.
    ByEntity(&'a dyn Loggable),
}

impl SubjectRef<'static> {
    /// A raw `(alias, id)` reference.
    pub fn id(alias: impl Into<String>, id: impl Into<EntityId>) -> Self {
        Self::ById {
            alias: alias.into(),
            id: id.into(),
        }
    }

    /// Builds a raw reference from dynamically typed input.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::InvalidArgument`] unless `alias` is a
    /// non-empty JSON string and `id` is present and a JSON string or
    /// integer.
    pub fn parse(alias: &Value, id: Option<&Value>) -> Result<Self, ActivityError> {
        let alias = match alias {
            Value::String(s) if !s.trim().is_empty() => s.clone(),
            Value::String(_) => {
                return Err(ActivityError::InvalidArgument(
                    "subject alias must not be empty".to_string(),
                ))
            }
            other => {
                return Err(ActivityError::InvalidArgument(format!(
                    "subject alias must be a string, got {other}"
                )))
            }
        };

        let id = match id {
            Some(raw) => EntityId::from_json(raw).ok_or_else(|| {
                ActivityError::InvalidArgument(format!(
                    "subject id must be a string or an integer, got {raw}"
                ))
            })?,
            None => {
                return Err(ActivityError::InvalidArgument(format!(
                    "subject alias '{alias}' was given without an id"
                )))
            }
        };

        Ok(Self::ById { alias, id })
    }
}

impl<'a> From<&'a dyn Loggable> for SubjectRef<'a> {
    fn from(entity: &'a dyn Loggable) -> Self {
        Self::ByEntity(entity)
    }
}

impl<'a, T: Loggable> From<&'a T> for SubjectRef<'a> {
    fn from(entity: &'a T) -> Self {
        Self::ByEntity(entity)
    }
}

impl<A: Into<String>, I: Into<EntityId>> From<(A, I)> for SubjectRef<'static> {
    fn from((alias, id): (A, I)) -> Self {
        Self::id(alias, id)
    }
}
