//! Persistence for roster.
//!
//! The [`storage`] module defines the store traits the API is written
//! against, [`storage::sqlite::SqliteStorage`] implements them on top of
//! diesel and a bb8 connection pool.

pub mod models;
pub mod schema;
pub mod storage;
