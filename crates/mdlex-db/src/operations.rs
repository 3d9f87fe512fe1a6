//! Database operations.

pub mod documents;
pub mod query;
pub mod stats;
pub mod views;
