//! The entry point that hands out activity builders.

use std::sync::Arc;

use actlog_morph::MorphMap;

use crate::builder::ActivityBuilder;
use crate::store::ActivityStore;

/// Shared handle to a morph map and a store.
///
/// Cloning is cheap; every clone refers to the same registry and store.
pub struct ActivityLogger<S: ActivityStore> {
    registry: Arc<MorphMap>,
    store: Arc<S>,
}

impl<S: ActivityStore> ActivityLogger<S> {
    /// Creates a logger that owns `registry` and `store`.
    pub fn new(registry: MorphMap, store: S) -> Self {
        Self::from_shared(Arc::new(registry), Arc::new(store))
    }

    /// Creates a logger over a registry and store shared with other owners.
    pub fn from_shared(registry: Arc<MorphMap>, store: Arc<S>) -> Self {
        tracing::debug!(aliases = registry.len(), "activity logger created");
        Self { registry, store }
    }

    /// Starts a new, empty activity record.
    pub fn activity(&self) -> ActivityBuilder<S> {
        ActivityBuilder::new(Arc::clone(&self.registry), Arc::clone(&self.store))
    }

    /// The morph map used to resolve entity aliases.
    pub fn registry(&self) -> &MorphMap {
        &self.registry
    }

    /// The store records are written to.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ActivityStore> Clone for ActivityLogger<S> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            store: Arc::clone(&self.store),
        }
    }
}

/// Generates a fresh batch id for grouping related records.
pub fn new_batch_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
