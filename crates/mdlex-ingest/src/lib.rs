//! mdlex ingest - turn a directory of Markdown notes into a queryable table.
//!
//! This crate provides:
//! - Front matter extraction from Markdown documents
//! - Document discovery under a directory
//! - Schema inference and consistency validation
//! - Typed view generation
//! - Batched ingestion into the raw document store

mod discover;
mod error;
mod frontmatter;
mod ingestor;
mod loader;
mod schema;
mod view;
mod yaml;

pub use discover::{discover, Discovered, DiscoveryOptions};
pub use error::{FileFailure, IngestError, IngestResult};
pub use frontmatter::{extract, Extraction, FrontMatterExtractor};
pub use ingestor::{IngestReport, Ingestor};
pub use loader::{load_directory, LoadSummary, Loader};
pub use schema::{analyze, Conflict, Schema, SchemaAnalyzer, SchemaConflicts, SchemaReport, ValidatedSchema};
pub use view::{build_view, ViewGenerator};
