//! Mdlex Core - Core types and domain models for the mdlex document store.

mod error;
mod types;
mod value;

pub use error::{Error, Result};
pub use types::*;
pub use value::{metadata_to_json, DateValue, MetaValue, Metadata, TypeTag};
