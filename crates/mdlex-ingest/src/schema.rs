//! Schema inference and consistency checking.

use crate::discover::{discover, DiscoveryOptions};
use crate::error::{FileFailure, IngestError, IngestResult};
use crate::frontmatter::FrontMatterExtractor;
use mdlex_config::Config;
use mdlex_core::{Metadata, TypeTag};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Every front matter key seen in a corpus, with the set of types it took.
///
/// Keys and tags are kept in sorted collections, so two schemas built from
/// the same documents are equal regardless of visiting order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    fields: BTreeMap<String, BTreeSet<TypeTag>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: impl Into<String>, tag: TypeTag) {
        self.fields.entry(key.into()).or_default().insert(tag);
    }

    /// Record the top-level keys of one document. Null values are skipped.
    pub fn record_metadata(&mut self, metadata: &Metadata) {
        for (key, value) in metadata {
            if let Some(tag) = value.type_tag() {
                self.record(key.as_str(), tag);
            }
        }
    }

    pub fn types(&self, key: &str) -> Option<&BTreeSet<TypeTag>> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &BTreeSet<TypeTag>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check that every key has exactly one type.
    ///
    /// All offending keys are reported together, not just the first.
    pub fn validate(&self) -> Result<ValidatedSchema, SchemaConflicts> {
        let conflicts: Vec<Conflict> = self
            .fields
            .iter()
            .filter(|(_, tags)| tags.len() > 1)
            .map(|(key, tags)| Conflict {
                key: key.clone(),
                types: tags.iter().copied().collect(),
            })
            .collect();

        if !conflicts.is_empty() {
            return Err(SchemaConflicts(conflicts));
        }

        let fields = self
            .fields
            .iter()
            .filter_map(|(key, tags)| tags.iter().next().map(|tag| (key.clone(), *tag)))
            .collect();
        Ok(ValidatedSchema { fields })
    }
}

/// A schema in which every key has a single type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidatedSchema {
    fields: BTreeMap<String, TypeTag>,
}

impl ValidatedSchema {
    pub fn fields(&self) -> impl Iterator<Item = (&str, TypeTag)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn get(&self, key: &str) -> Option<TypeTag> {
        self.fields.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A key observed with more than one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub key: String,
    /// Sorted alphabetically.
    pub types: Vec<TypeTag>,
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let types: Vec<&str> = self.types.iter().map(|t| t.as_str()).collect();
        write!(f, "{}: {}", self.key, types.join(", "))
    }
}

/// Every inconsistent key of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConflicts(pub Vec<Conflict>);

impl SchemaConflicts {
    pub fn conflicts(&self) -> &[Conflict] {
        &self.0
    }
}

impl std::fmt::Display for SchemaConflicts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Schema inconsistencies found:")?;
        for conflict in &self.0 {
            write!(f, "\n  {}", conflict)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaConflicts {}

/// Outcome of scanning a directory for its schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaReport {
    pub schema: Schema,
    pub documents_scanned: usize,
    pub failures: Vec<FileFailure>,
}

/// Builds a [`Schema`] from the documents under a directory.
#[derive(Debug, Clone, Default)]
pub struct SchemaAnalyzer {
    extractor: FrontMatterExtractor,
    discovery: DiscoveryOptions,
}

impl SchemaAnalyzer {
    pub fn new(extractor: FrontMatterExtractor, discovery: DiscoveryOptions) -> Self {
        Self {
            extractor,
            discovery,
        }
    }

    /// Build an analyzer from the `[documents]` and `[extract]` settings.
    pub fn from_config(config: &Config) -> IngestResult<Self> {
        Ok(Self::new(
            FrontMatterExtractor::from_config(&config.extract),
            DiscoveryOptions::from_config(&config.documents)?,
        ))
    }

    /// Scan every document under `root`. Unreadable files are logged,
    /// listed in the report, and left out of the schema.
    pub fn analyze(&self, root: &Path) -> IngestResult<SchemaReport> {
        info!("Analyzing front matter schema under {}", root.display());

        let found = discover(root, &self.discovery)?;
        let mut report = SchemaReport {
            failures: found.failures,
            ..Default::default()
        };

        for path in &found.files {
            match std::fs::read_to_string(path) {
                Ok(text) => {
                    let extraction = self.extractor.extract(&text);
                    if let Some(warning) = extraction.warning {
                        debug!("{}: {}", path.display(), warning);
                    }
                    report.schema.record_metadata(&extraction.metadata);
                    report.documents_scanned += 1;
                }
                Err(e) => {
                    let err = IngestError::Read {
                        path: path.clone(),
                        source: e,
                    };
                    warn!("{}", err);
                    report.failures.push(FileFailure::new(path, err));
                }
            }
        }

        info!(
            "Scanned {} documents, found {} keys",
            report.documents_scanned,
            report.schema.len()
        );
        Ok(report)
    }
}

/// Analyze with default extraction and discovery settings.
pub fn analyze(root: &Path) -> IngestResult<SchemaReport> {
    SchemaAnalyzer::default().analyze(root)
}
