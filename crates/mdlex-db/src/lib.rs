//! Mdlex DB - Storage layer for mdlex using SQLite.

mod database;
mod error;
mod migrations;
mod operations;

pub use database::Database;
pub use error::{DbError, DbResult};
pub use operations::documents::DocumentBatch;
pub use operations::query::{parse_param, Row};

