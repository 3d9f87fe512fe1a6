//! Core domain types for mdlex.

use crate::error::Result;
use crate::value::{metadata_to_json, Metadata, TypeTag};
use serde::{Deserialize, Serialize};

/// Name of the raw document table.
pub const RAW_TABLE: &str = "documents_raw";

/// Default name of the generated typed view.
pub const DEFAULT_VIEW_NAME: &str = "documents";

/// Columns every generated view carries regardless of the schema.
pub const RESERVED_COLUMNS: [&str; 3] = ["id", "path", "body"];

/// A document ready to be written to the raw store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Canonical absolute path; the upsert key.
    pub path: String,
    /// Front matter as a JSON object.
    pub metadata: serde_json::Value,
    pub body: String,
}

impl RawDocument {
    pub fn new(path: impl Into<String>, metadata: serde_json::Value, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            metadata,
            body: body.into(),
        }
    }

    /// Build a raw document from extracted front matter.
    pub fn from_metadata(
        path: impl Into<String>,
        metadata: &Metadata,
        body: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::new(path, metadata_to_json(metadata)?, body))
    }
}

/// A row read back from the raw store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: i64,
    pub path: String,
    pub metadata: serde_json::Value,
    pub body: String,
}

/// Quote an SQL identifier with double quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// One output column of the typed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewColumn {
    pub name: String,
    /// SQL expression producing the column.
    pub expression: String,
    /// Type of the front matter key behind the column, `None` for passthrough columns.
    pub type_tag: Option<TypeTag>,
}

impl ViewColumn {
    pub fn passthrough(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            expression: quote_identifier(&name),
            name,
            type_tag: None,
        }
    }
}

/// A typed projection over the raw table. Describes the view only; installing
/// it is up to the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDefinition {
    pub name: String,
    pub source_table: String,
    pub columns: Vec<ViewColumn>,
}

impl ViewDefinition {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// The `SELECT` statement the view is defined as.
    pub fn select_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("    {} AS {}", c.expression, quote_identifier(&c.name)))
            .collect::<Vec<_>>()
            .join(",\n");
        format!(
            "SELECT\n{}\nFROM {}",
            columns,
            quote_identifier(&self.source_table)
        )
    }

    pub fn create_sql(&self) -> String {
        format!(
            "CREATE VIEW {} AS\n{}",
            quote_identifier(&self.name),
            self.select_sql()
        )
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP VIEW IF EXISTS {}", quote_identifier(&self.name))
    }
}

/// Database statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub total_documents: i64,
    pub documents_with_metadata: i64,
    pub view_name: String,
    pub view_columns: Vec<String>,
    pub database_size_bytes: i64,
    /// Result of `PRAGMA integrity_check`.
    pub integrity_ok: bool,
}
