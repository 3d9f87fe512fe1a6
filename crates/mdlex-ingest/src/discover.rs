//! Document discovery.

use crate::error::{FileFailure, IngestError, IngestResult};
use glob::Pattern;
use mdlex_config::DocumentsConfig;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Which files under a root count as documents.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    patterns: Vec<Pattern>,
    skip_hidden: bool,
    follow_links: bool,
}

impl DiscoveryOptions {
    pub fn new(patterns: &[String], skip_hidden: bool, follow_links: bool) -> IngestResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| IngestError::InvalidPattern {
                    pattern: p.clone(),
                    message: e.msg.to_string(),
                })
            })
            .collect::<IngestResult<Vec<_>>>()?;

        Ok(Self {
            patterns,
            skip_hidden,
            follow_links,
        })
    }

    pub fn from_config(config: &DocumentsConfig) -> IngestResult<Self> {
        Self::new(&config.patterns, config.skip_hidden, config.follow_links)
    }

    fn matches(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(file_name))
    }
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            patterns: Pattern::new("*.md").into_iter().collect(),
            skip_hidden: true,
            follow_links: true,
        }
    }
}

/// Files found under a root.
#[derive(Debug, Default)]
pub struct Discovered {
    /// Canonical absolute paths, sorted and free of duplicates.
    pub files: Vec<PathBuf>,
    /// Entries that could not be visited.
    pub failures: Vec<FileFailure>,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|n| n.starts_with('.'))
            .unwrap_or(false)
}

/// Recursively collect every document under `root`.
///
/// The root itself must be a readable directory. Problems below it are
/// recorded and skipped.
pub fn discover(root: &Path, options: &DiscoveryOptions) -> IngestResult<Discovered> {
    if !root.is_dir() {
        return Err(IngestError::NotADirectory(root.to_path_buf()));
    }

    let mut files = BTreeSet::new();
    let mut failures = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(options.skip_hidden && is_hidden(e)));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                warn!("Skipping {}: {}", path.display(), e);
                failures.push(FileFailure::new(path, e));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let name_matches = entry
            .file_name()
            .to_str()
            .map(|n| options.matches(n))
            .unwrap_or(false);
        if !name_matches {
            debug!("Skipping non-document: {:?}", entry.path());
            continue;
        }

        match entry.path().canonicalize() {
            Ok(path) => {
                files.insert(path);
            }
            Err(e) => {
                warn!("Failed to resolve {:?}: {}", entry.path(), e);
                failures.push(FileFailure::new(entry.path(), e));
            }
        }
    }

    debug!("Discovered {} documents under {}", files.len(), root.display());

    Ok(Discovered {
        files: files.into_iter().collect(),
        failures,
    })
}
