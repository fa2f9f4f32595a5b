//! Activity record builder and persistence port.
//!
//! [`ActivityLogger`] holds the morph map and a store implementing
//! [`ActivityStore`]. Each call to [`ActivityLogger::activity`] starts an
//! [`ActivityBuilder`] which collects the actor, the subject, the event,
//! before/after snapshots and free-form extra values, and finally writes the
//! record through the store.
//!
//! ```rust
//! use actlog_core::{ActivityLogger, MemoryStore, StoredRecord};
//! use actlog_morph::MorphMap;
//! use serde_json::json;
//!
//! # tokio_test_block(async {
//! let logger = ActivityLogger::new(MorphMap::new(), MemoryStore::new());
//!
//! let before = json!({ "title": "old" }).as_object().cloned().unwrap();
//! let after = json!({ "title": "new" }).as_object().cloned().unwrap();
//!
//! let record = logger
//!     .activity()
//!     .by(("users", 1))
//!     .unwrap()
//!     .on(("posts", 7))
//!     .unwrap()
//!     .making("update")
//!     .previous_state(before)
//!     .having_current(after)
//!     .log("Edited post")
//!     .await
//!     .unwrap();
//!
//! assert_eq!(record.diff().to_json(), json!({ "title": "new" }));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod builder;
mod error;
mod logger;
mod memory;
mod store;
mod subject;

pub use builder::{snapshot, ActivityBuilder};
pub use error::ActivityError;
pub use logger::{new_batch_id, ActivityLogger};
pub use memory::{MemoryStore, MemoryStoreError};
pub use store::{ActivityStore, StoredActivity, StoredRecord};
pub use subject::SubjectRef;
