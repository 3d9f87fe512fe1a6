//! Typed view generation.

use crate::schema::ValidatedSchema;
use mdlex_core::{ViewColumn, ViewDefinition, DEFAULT_VIEW_NAME, RAW_TABLE, RESERVED_COLUMNS};
use std::collections::HashSet;
use tracing::warn;

/// Builds the view that exposes each front matter key as its own column.
#[derive(Debug, Clone)]
pub struct ViewGenerator {
    name: String,
}

impl ViewGenerator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Describe the view for `schema`: `id`, `path`, one column per key in
    /// key order, then `body`.
    ///
    /// SQLite folds identifier case, so a key that matches a reserved column
    /// or an earlier key case-insensitively is left out, as is any key that
    /// cannot be written inside a JSON path label.
    pub fn build(&self, schema: &ValidatedSchema) -> ViewDefinition {
        let mut taken: HashSet<String> = RESERVED_COLUMNS.iter().map(|c| c.to_string()).collect();

        let mut columns = vec![ViewColumn::passthrough("id"), ViewColumn::passthrough("path")];

        for (key, tag) in schema.fields() {
            if key.is_empty() || key.contains('"') || key.chars().any(char::is_control) {
                warn!("Front matter key {:?} cannot be used as a view column, skipping", key);
                continue;
            }
            if !taken.insert(key.to_lowercase()) {
                warn!("Front matter key '{}' collides with another column, skipping", key);
                continue;
            }

            columns.push(ViewColumn {
                name: key.to_string(),
                expression: json_extract(key),
                type_tag: Some(tag),
            });
        }

        columns.push(ViewColumn::passthrough("body"));

        ViewDefinition {
            name: self.name.clone(),
            source_table: RAW_TABLE.to_string(),
            columns,
        }
    }
}

impl Default for ViewGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_NAME)
    }
}

fn json_extract(key: &str) -> String {
    format!(
        "json_extract(\"metadata\", '$.\"{}\"')",
        key.replace('\'', "''")
    )
}

/// Build the default view for `schema`.
pub fn build_view(schema: &ValidatedSchema) -> ViewDefinition {
    ViewGenerator::default().build(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use mdlex_core::{RawDocument, TypeTag};
    use mdlex_db::Database;
    use serde_json::json;

    fn validated(fields: &[(&str, TypeTag)]) -> ValidatedSchema {
        let mut schema = Schema::new();
        for (key, tag) in fields {
            schema.record(*key, *tag);
        }
        schema.validate().unwrap()
    }

    #[test]
    fn test_empty_schema() {
        let view = build_view(&ValidatedSchema::default());
        assert_eq!(view.name, "documents");
        assert_eq!(view.column_names(), vec!["id", "path", "body"]);
    }

    #[test]
    fn test_one_column_per_key() {
        let view = build_view(&validated(&[
            ("title", TypeTag::String),
            ("count", TypeTag::Integer),
        ]));

        assert_eq!(view.column_names(), vec!["id", "path", "count", "title", "body"]);
        let count = &view.columns[2];
        assert_eq!(count.type_tag, Some(TypeTag::Integer));
        assert_eq!(count.expression, "json_extract(\"metadata\", '$.\"count\"')");
    }

    #[test]
    fn test_same_schema_same_view() {
        let schema = validated(&[("a", TypeTag::String), ("b", TypeTag::Date)]);
        assert_eq!(build_view(&schema), build_view(&schema));
        assert_eq!(build_view(&schema).create_sql(), build_view(&schema).create_sql());
    }

    #[test]
    fn test_skips_colliding_keys() {
        let view = build_view(&validated(&[
            ("Path", TypeTag::String),
            ("Title", TypeTag::String),
            ("title", TypeTag::String),
            ("bad\"key", TypeTag::String),
        ]));

        assert_eq!(view.column_names(), vec!["id", "path", "Title", "body"]);
    }

    #[test]
    fn test_custom_name() {
        let view = ViewGenerator::new("notes").build(&ValidatedSchema::default());
        assert_eq!(view.name, "notes");
        assert!(view.create_sql().starts_with("CREATE VIEW \"notes\""));
    }

    #[test]
    fn test_awkward_keys_query_correctly() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_document(&RawDocument::new(
            "/a.md",
            json!({"it's": 1, "a.b": "dotted", "with space": true}),
            "",
        ))
        .unwrap();

        let view = build_view(&validated(&[
            ("it's", TypeTag::Integer),
            ("a.b", TypeTag::String),
            ("with space", TypeTag::Boolean),
        ]));
        db.install_view(&view).unwrap();

        let rows = db
            .query("SELECT \"it's\", \"a.b\", \"with space\" FROM documents", &[])
            .unwrap();
        assert_eq!(rows[0]["it's"], json!(1));
        assert_eq!(rows[0]["a.b"], "dotted");
        assert_eq!(rows[0]["with space"], json!(1));
    }
}
