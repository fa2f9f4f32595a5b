//! Error types for building and writing activity records.

use actlog_morph::MorphError;

/// Errors that can occur while building or writing an activity record.
#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    /// A builder call received a malformed subject.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A typed entity's type is not registered in the morph map.
    #[error(transparent)]
    NotFound(#[from] MorphError),

    /// A snapshot could not be serialised into a JSON object.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store rejected the record. The store's own error is kept as the
    /// source, unchanged.
    #[error("activity store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ActivityError {
    /// Returns the store's error if this is a [`ActivityError::Store`] of
    /// type `E`.
    pub fn store_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Store(source) => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}
