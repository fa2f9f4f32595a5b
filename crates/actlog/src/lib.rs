//! Activity logging for Rust applications.
//!
//! Records who did what to which entity, with optional before/after
//! snapshots from which field-level changes are derived on read.
//!
//! - [`diff`]: changes and patches between two JSON snapshots.
//! - [`morph`]: the alias registry for polymorphic actor/entity references.
//! - [`ActivityLogger`] / [`ActivityBuilder`]: the fluent record builder.
//! - [`sqlite`]: the SQLite store, with transactions and filtered reads.
//! - [`config`], [`telemetry`], [`bootstrap()`]: process wiring.
//!
//! ```rust,no_run
//! use actlog::{bootstrap, config, telemetry, EntityId, Loggable, MorphMap};
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
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = config::load_config(Some("actlog.toml"))?;
//! telemetry::init_tracing(&config.logging);
//!
//! let mut registry = MorphMap::new();
//! registry.register_type::<User>("users");
//!
//! let logger = bootstrap(&config, registry).await?;
//! logger
//!     .activity()
//!     .by(&User { id: 1 })?
//!     .making("login")
//!     .log("User logged in")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod config;
pub mod telemetry;

pub use bootstrap::{bootstrap, BootstrapError};

pub use actlog_core::{
    new_batch_id, snapshot, ActivityBuilder, ActivityError, ActivityLogger, ActivityStore,
    MemoryStore, MemoryStoreError, StoredActivity, StoredRecord, SubjectRef,
};
pub use actlog_morph::{MorphError, MorphMap, Target};
pub use actlog_types::{ActivityState, EntityId, EntityType, JsonObject, Loggable};

/// Snapshot diffing.
pub mod diff {
    pub use actlog_diff::*;
}

/// The alias registry.
pub mod morph {
    pub use actlog_morph::*;
}

/// SQLite persistence.
pub mod sqlite {
    pub use actlog_db::{create_pool, run_migrations, DbPool, DbRuntimeSettings};
    pub use actlog_sqlite::*;
}
