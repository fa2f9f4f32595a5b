//! SQLite persistence for activity records.
//!
//! [`SqliteActivityStore`] implements the [`actlog_core::ActivityStore`]
//! port over an `actlog-db` connection pool. Besides plain writes it offers
//! caller-managed transactions ([`SqliteActivityStore::begin`]) whose
//! [`WriteOptions`] are handed to the builder via `query_options`, and
//! filtered reads ([`SqliteActivityStore::query_activities`]).
//!
//! Actor and entity ids are stored in untyped columns, so integer ids come
//! back as integers and text ids as text.

mod error;
mod row;
mod store;
mod transaction;

pub use error::StoreError;
pub use store::{ActivityFilter, SqliteActivityStore};
pub use transaction::{StoreTransaction, WriteOptions};
