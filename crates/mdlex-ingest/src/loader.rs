//! End-to-end loading: analyze, validate, install the view, ingest.

use crate::discover::DiscoveryOptions;
use crate::error::IngestResult;
use crate::frontmatter::FrontMatterExtractor;
use crate::ingestor::{IngestReport, Ingestor};
use crate::schema::{SchemaAnalyzer, SchemaReport, ValidatedSchema};
use crate::view::ViewGenerator;
use mdlex_config::Config;
use mdlex_core::ViewDefinition;
use mdlex_db::Database;
use std::path::Path;
use tracing::{info, warn};

/// Everything a successful load produced.
#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub report: SchemaReport,
    pub view: ViewDefinition,
    pub ingest: IngestReport,
}

/// Drives a full load of one directory into one database.
pub struct Loader {
    db: Database,
    analyzer: SchemaAnalyzer,
    ingestor: Ingestor,
    views: ViewGenerator,
}

impl Loader {
    /// Build a loader from the user's configuration.
    pub fn new(db: Database, config: &Config) -> IngestResult<Self> {
        let extractor = FrontMatterExtractor::from_config(&config.extract);
        let discovery = DiscoveryOptions::from_config(&config.documents)?;

        Ok(Self {
            analyzer: SchemaAnalyzer::new(extractor.clone(), discovery.clone()),
            ingestor: Ingestor::new(db.clone(), extractor, discovery),
            views: ViewGenerator::new(config.view.name.clone()),
            db,
        })
    }

    pub fn with_defaults(db: Database) -> Self {
        Self {
            analyzer: SchemaAnalyzer::default(),
            ingestor: Ingestor::with_defaults(db.clone()),
            views: ViewGenerator::default(),
            db,
        }
    }

    /// Scan `root` without touching the database.
    pub fn analyze(&self, root: &Path) -> IngestResult<SchemaReport> {
        self.analyzer.analyze(root)
    }

    /// Install the view for `schema` and ingest every document under `root`.
    pub fn apply(
        &self,
        root: &Path,
        schema: &ValidatedSchema,
    ) -> IngestResult<(ViewDefinition, IngestReport)> {
        let view = self.views.build(schema);
        self.db.install_view(&view)?;
        let ingest = self.ingestor.ingest_directory(root)?;
        Ok((view, ingest))
    }

    /// Load `root` into the database.
    ///
    /// An inconsistent schema aborts the load before the view or any row is
    /// written.
    pub fn load(&self, root: &Path) -> IngestResult<LoadSummary> {
        let report = self.analyze(root)?;
        for (key, tags) in report.schema.fields() {
            let names: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
            info!("  {}: {}", key, names.join(", "));
        }

        let validated = report.schema.validate().map_err(|conflicts| {
            warn!("{}", conflicts);
            conflicts
        })?;

        let (view, ingest) = self.apply(root, &validated)?;
        Ok(LoadSummary {
            report,
            view,
            ingest,
        })
    }
}

/// Load `root` into `db` with default settings.
pub fn load_directory(db: &Database, root: &Path) -> IngestResult<LoadSummary> {
    Loader::with_defaults(db.clone()).load(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn consistent_docs() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("doc1.md"),
            "---\ntitle: \"Test Doc 1\"\ntags: [\"tag1\", \"tag2\"]\ncount: 42\n---\n# Test Content 1",
        )
        .unwrap();
        fs::write(
            dir.path().join("doc2.md"),
            "---\ntitle: \"Test Doc 2\"\ntags: [\"tag3\"]\ncount: 43\n---\n# Test Content 2",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_load_creates_table_and_view() {
        let db = Database::open_in_memory().unwrap();
        let dir = consistent_docs();

        let summary = load_directory(&db, dir.path()).unwrap();

        assert_eq!(summary.report.documents_scanned, 2);
        assert_eq!(summary.ingest.processed, 2);
        assert!(db.view_exists("documents").unwrap());
        assert_eq!(
            db.view_columns("documents").unwrap(),
            vec!["id", "path", "count", "tags", "title", "body"]
        );
        assert_eq!(db.count_documents().unwrap(), 2);
    }

    #[test]
    fn test_values_visible_through_view() {
        let db = Database::open_in_memory().unwrap();
        let dir = consistent_docs();
        load_directory(&db, dir.path()).unwrap();

        let rows = db
            .query("SELECT count FROM documents ORDER BY count", &[])
            .unwrap();
        let counts: Vec<_> = rows.iter().map(|r| r["count"].clone()).collect();
        assert_eq!(counts, vec![json!(42), json!(43)]);

        let rows = db
            .query(
                "SELECT body FROM documents WHERE title = ?1",
                &[json!("Test Doc 2")],
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["body"], "# Test Content 2");
    }

    #[test]
    fn test_inconsistent_schema_writes_nothing() {
        let db = Database::open_in_memory().unwrap();
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("doc1.md"),
            "---\ntitle: \"Test Doc 1\"\ntags: [\"tag1\", \"tag2\"]\ncount: 42\n---\n# Test Content 1",
        )
        .unwrap();
        fs::write(
            dir.path().join("doc2.md"),
            "---\ntitle: \"Test Doc 2\"\ntags: \"single-tag\"\ncount: \"43\"\n---\n# Test Content 2",
        )
        .unwrap();

        let err = load_directory(&db, dir.path()).unwrap_err();
        match &err {
            IngestError::InconsistentSchema(conflicts) => {
                assert_eq!(conflicts.conflicts().len(), 2);
            }
            other => panic!("unexpected error: {}", other),
        }
        let message = err.to_string();
        assert!(message.contains("tags: list, string"));
        assert!(message.contains("count: integer, string"));

        assert!(!db.view_exists("documents").unwrap());
        assert_eq!(db.count_documents().unwrap(), 0);
    }

    #[test]
    fn test_reload_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let dir = consistent_docs();

        let first = load_directory(&db, dir.path()).unwrap();
        let second = load_directory(&db, dir.path()).unwrap();

        assert_eq!(first.view, second.view);
        assert_eq!(db.count_documents().unwrap(), 2);
    }

    #[test]
    fn test_view_follows_new_keys() {
        let db = Database::open_in_memory().unwrap();
        let dir = consistent_docs();
        load_directory(&db, dir.path()).unwrap();

        fs::write(dir.path().join("doc3.md"), "---\nauthor: Ada\n---\nThird").unwrap();
        load_directory(&db, dir.path()).unwrap();

        let columns = db.view_columns("documents").unwrap();
        assert!(columns.contains(&"author".to_string()));
        let rows = db
            .query("SELECT author FROM documents WHERE author IS NOT NULL", &[])
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_configured_view_name() {
        let db = Database::open_in_memory().unwrap();
        let dir = consistent_docs();

        let mut config = Config::default();
        config.view.name = "notes".to_string();
        Loader::new(db.clone(), &config).unwrap().load(dir.path()).unwrap();

        assert!(db.view_exists("notes").unwrap());
        assert!(!db.view_exists("documents").unwrap());
    }

    #[test]
    fn test_quoted_date_loads_as_string() {
        let db = Database::open_in_memory().unwrap();
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "---\nversion: \"2023-01-01\"\n---\nA").unwrap();
        fs::write(dir.path().join("b.md"), "---\nversion: beta\n---\nB").unwrap();

        let summary = load_directory(&db, dir.path()).unwrap();

        assert_eq!(
            summary.report.schema.validate().unwrap().get("version"),
            Some(mdlex_core::TypeTag::String)
        );
        let rows = db
            .query("SELECT version FROM documents ORDER BY version", &[])
            .unwrap();
        let versions: Vec<_> = rows.iter().map(|r| r["version"].clone()).collect();
        assert_eq!(versions, vec![json!("2023-01-01"), json!("beta")]);
    }

    #[test]
    fn test_empty_directory() {
        let db = Database::open_in_memory().unwrap();
        let dir = tempdir().unwrap();

        let summary = load_directory(&db, dir.path()).unwrap();
        assert_eq!(summary.ingest.processed, 0);
        assert_eq!(
            db.view_columns("documents").unwrap(),
            vec!["id", "path", "body"]
        );
    }
}
