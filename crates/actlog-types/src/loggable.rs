//! Entity capability and type handles used for polymorphic references.

use std::any::TypeId;
use std::hash::{Hash, Hasher};

use crate::{EntityId, JsonObject};

/// An opaque handle to a concrete entity type.
///
/// Equality and hashing use the type's [`TypeId`]; the name is carried for
/// diagnostics only.
#[derive(Debug, Clone, Copy)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
}

impl EntityType {
    /// Returns the handle for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying type id.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified Rust type name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// A domain object that can appear as the actor or the subject of an
/// activity record.
///
/// Only [`log_id`](Loggable::log_id) is required. Entities that implement
/// [`loggable_state`](Loggable::loggable_state) have their snapshot stored
/// as the record's `current` state automatically when passed to
/// `ActivityBuilder::on`.
///
/// # Example
///
/// ```rust
/// use actlog_types::{EntityId, JsonObject, Loggable};
///
/// struct Post {
///     id: i64,
///     title: String,
/// }
///
/// impl Loggable for Post {
///     fn log_id(&self) -> EntityId {
///         EntityId::from(self.id)
///     }
///
///     fn loggable_state(&self) -> Option<JsonObject> {
///         let mut state = JsonObject::new();
///         state.insert("id".into(), self.id.into());
///         state.insert("title".into(), self.title.clone().into());
///         Some(state)
///     }
/// }
/// ```
pub trait Loggable: Send + Sync + 'static {
    /// The identity stored in the record's `actor_id` / `entity_id`.
    fn log_id(&self) -> EntityId;

    /// Snapshot used as the record's automatic `current` state.
    fn loggable_state(&self) -> Option<JsonObject> {
        None
    }

    /// The concrete type of this entity.
    fn entity_type(&self) -> EntityType {
        EntityType::of::<Self>()
    }

    /// Every type this entity counts as an instance of, most specific first.
    ///
    /// Override to declare supertypes, so that an entity registered under a
    /// base type's alias resolves to that alias.
    fn lineage(&self) -> Vec<EntityType> {
        vec![self.entity_type()]
    }
}
