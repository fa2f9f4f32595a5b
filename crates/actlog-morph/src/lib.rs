//! Polymorphic type registry ("morph map") for activity records.
//!
//! An activity record references its actor and its subject as an
//! `(alias, id)` pair instead of a foreign key per entity type. The morph
//! map resolves between those aliases and the concrete Rust types of the
//! entities, so the builder never needs to know the application's domain
//! types.
//!
//! Registration is explicit and happens once during bootstrap; afterwards
//! the map is shared read-only (typically behind an `Arc`).
//!
//! # Usage
//!
//! ```rust
//! use actlog_morph::MorphMap;
//! use actlog_types::{EntityId, EntityType, Loggable};
//!
//! struct User {
//!     id: i64,
//! }
//!
//! impl Loggable for User {
//!     fn log_id(&self) -> EntityId {
//!         EntityId::from(self.id)
//!     }
//! }
//!
//! let mut map = MorphMap::new();
//! map.register_type::<User>("users");
//!
//! assert_eq!(map.resolve("users").unwrap(), EntityType::of::<User>());
//! assert_eq!(map.alias_of(&User { id: 1 }).unwrap(), "users");
//! assert!(map.resolve("missing").is_err());
//! ```

mod error;
mod map;

pub use error::MorphError;
pub use map::{MorphMap, Target};
