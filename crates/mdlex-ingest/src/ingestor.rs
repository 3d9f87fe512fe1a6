//! Main ingestion logic.

use crate::discover::{discover, DiscoveryOptions};
use crate::error::{FileFailure, IngestError, IngestResult};
use crate::frontmatter::FrontMatterExtractor;
use mdlex_core::RawDocument;
use mdlex_db::Database;
use std::path::Path;
use tracing::{debug, info, warn};

/// Result of ingesting a directory.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Documents written to the raw store.
    pub processed: usize,
    /// Documents skipped because of a per-file error.
    pub failures: Vec<FileFailure>,
}

/// Writes documents into the raw store.
pub struct Ingestor {
    db: Database,
    extractor: FrontMatterExtractor,
    discovery: DiscoveryOptions,
}

impl Ingestor {
    /// Create a new ingestor.
    pub fn new(db: Database, extractor: FrontMatterExtractor, discovery: DiscoveryOptions) -> Self {
        Self {
            db,
            extractor,
            discovery,
        }
    }

    /// Create an ingestor with default extraction and discovery settings.
    pub fn with_defaults(db: Database) -> Self {
        Self::new(db, FrontMatterExtractor::new(), DiscoveryOptions::default())
    }

    /// Read one file and turn it into a row for the raw store.
    pub fn prepare_document(&self, path: &Path) -> IngestResult<RawDocument> {
        let path = path.canonicalize().map_err(|e| IngestError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let text = std::fs::read_to_string(&path).map_err(|e| IngestError::Read {
            path: path.clone(),
            source: e,
        })?;

        let (metadata, body) = self.extractor.extract(&text).into_parts();

        RawDocument::from_metadata(path.to_string_lossy(), &metadata, body).map_err(|e| {
            IngestError::Serialization {
                path: path.clone(),
                source: e,
            }
        })
    }

    /// Ingest a single file outside of any batch.
    pub fn ingest_file(&self, path: &Path) -> IngestResult<RawDocument> {
        let doc = self.prepare_document(path)?;
        self.db.upsert_document(&doc)?;
        info!("Ingested: {}", doc.path);
        Ok(doc)
    }

    /// Upsert every document under `root` in one transaction.
    ///
    /// Files that fail to read, serialize or write are logged and skipped;
    /// the rest are committed together once the walk is done.
    pub fn ingest_directory(&self, root: &Path) -> IngestResult<IngestReport> {
        let found = discover(root, &self.discovery)?;
        info!(
            "Ingesting {} documents from {}",
            found.files.len(),
            root.display()
        );

        let mut report = IngestReport {
            failures: found.failures,
            ..Default::default()
        };

        self.db.in_batch(|batch| -> IngestResult<()> {
            for path in &found.files {
                let result = self
                    .prepare_document(path)
                    .and_then(|doc| batch.upsert(&doc).map_err(IngestError::from));

                match result {
                    Ok(()) => {
                        debug!("Upserted {}", path.display());
                        report.processed += 1;
                    }
                    Err(e) => {
                        warn!("Failed to ingest {:?}: {}", path, e);
                        report.failures.push(FileFailure::new(path, e));
                    }
                }
            }
            Ok(())
        })?;

        info!(
            "Processed {} documents ({} skipped)",
            report.processed,
            report.failures.len()
        );
        Ok(report)
    }
}
