//! sw-db - Backend abstraction layer for Stepwise
//!
//! This crate provides the `Backend` trait and the built-in SQLite
//! implementation used by the migration engine.

pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::{DbError, DbResult};
pub use sqlite::SqliteBackend;
pub use traits::Backend;
