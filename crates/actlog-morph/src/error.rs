//! Error types for the morph map.

/// Errors returned by morph map lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MorphError {
    /// No type is registered under the alias.
    #[error("morph map has no binding for alias '{0}'")]
    AliasNotFound(String),

    /// Neither the type nor any type in the instance's lineage is registered.
    #[error("morph map has no alias for type '{0}'")]
    TypeNotFound(&'static str),
}
