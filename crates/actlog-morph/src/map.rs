//! The alias ↔ type bindings.

use actlog_types::{EntityType, Loggable};

use crate::error::MorphError;

/// What an alias lookup is performed for: a type, or an entity instance.
#[derive(Clone, Copy)]
pub enum Target<'a> {
    /// Matches a binding for exactly this type.
    Type(EntityType),
    /// Matches a binding for any type in the entity's lineage.
    Instance(&'a dyn Loggable),
}

impl Target<'_> {
    fn candidates(&self) -> Vec<EntityType> {
        match self {
            Self::Type(ty) => vec![*ty],
            Self::Instance(entity) => entity.lineage(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Type(ty) => ty.name(),
            Self::Instance(entity) => entity.entity_type().name(),
        }
    }
}

impl From<EntityType> for Target<'_> {
    fn from(ty: EntityType) -> Self {
        Self::Type(ty)
    }
}

impl<'a> From<&'a dyn Loggable> for Target<'a> {
    fn from(entity: &'a dyn Loggable) -> Self {
        Self::Instance(entity)
    }
}

impl<'a, T: Loggable> From<&'a T> for Target<'a> {
    fn from(entity: &'a T) -> Self {
        Self::Instance(entity)
    }
}

#[derive(Debug, Clone)]
struct Binding {
    alias: String,
    target: EntityType,
}

/// Bidirectional registry of alias ↔ entity type bindings.
///
/// Bindings keep their registration order. Lookups by type scan that order
/// and return the first match; registering two types that both match one
/// instance (through a declared lineage) makes the result depend on that
/// order and should be avoided.
#[derive(Debug, Clone, Default)]
pub struct MorphMap {
    bindings: Vec<Binding>,
}

impl MorphMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `alias` to `target`.
    ///
    /// Re-registering an alias replaces its type and keeps its original
    /// position in the registration order.
    pub fn register(&mut self, alias: impl Into<String>, target: EntityType) -> &mut Self {
        let alias = alias.into();
        match self.bindings.iter_mut().find(|b| b.alias == alias) {
            Some(existing) => {
                tracing::warn!(
                    alias = %alias,
                    previous = existing.target.name(),
                    replacement = target.name(),
                    "overwriting morph map binding"
                );
                existing.target = target;
            }
            None => {
                tracing::debug!(
                    alias = %alias,
                    target = target.name(),
                    "registered morph map alias"
                );
                self.bindings.push(Binding { alias, target });
            }
        }
        self
    }

    /// Binds `alias` to the type `T`.
    pub fn register_type<T: Loggable>(&mut self, alias: impl Into<String>) -> &mut Self {
        self.register(alias, EntityType::of::<T>())
    }

    /// Returns the type bound to `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::AliasNotFound`] if the alias is not registered.
    pub fn resolve(&self, alias: &str) -> Result<EntityType, MorphError> {
        self.bindings
            .iter()
            .find(|b| b.alias == alias)
            .map(|b| b.target)
            .ok_or_else(|| MorphError::AliasNotFound(alias.to_string()))
    }

    /// Whether `alias` is registered.
    pub fn has(&self, alias: &str) -> bool {
        self.bindings.iter().any(|b| b.alias == alias)
    }

    /// Whether a binding exists for the type, or for any type in the
    /// instance's lineage.
    pub fn has_type<'a>(&self, target: impl Into<Target<'a>>) -> bool {
        let candidates = target.into().candidates();
        self.bindings.iter().any(|b| candidates.contains(&b.target))
    }

    /// Returns the alias of the first binding whose type equals the type,
    /// or appears in the instance's lineage.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::TypeNotFound`] if no binding matches.
    pub fn alias_of<'a>(&self, target: impl Into<Target<'a>>) -> Result<&str, MorphError> {
        let target = target.into();
        let candidates = target.candidates();
        self.bindings
            .iter()
            .find(|b| candidates.contains(&b.target))
            .map(|b| b.alias.as_str())
            .ok_or_else(|| MorphError::TypeNotFound(target.type_name()))
    }

    /// Registered aliases in registration order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.alias.as_str())
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no binding is registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
