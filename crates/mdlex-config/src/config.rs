//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub documents: DocumentsConfig,

    #[serde(default)]
    pub view: ViewConfig,

    #[serde(default)]
    pub extract: ExtractConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &PathBuf) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::default_config_string())?;
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# mdlex configuration

[database]
# SQLite database file. The --db-path flag and the MDLEX_DB_PATH
# environment variable take precedence over this value.
# path = "~/notes/mdlex.db"

[documents]
# File name patterns picked up when scanning a directory
patterns = ["*.md"]

# Skip files and directories whose name starts with a dot
skip_hidden = true

# Follow symbolic links while walking
follow_links = true

[view]
# Name of the generated typed view
name = "documents"

[extract]
# What to keep as body when a front matter block fails to parse:
#   "keep_full_text" - the whole file, front matter included
#   "body_only"      - only the text after the closing delimiter
on_malformed = "keep_full_text"
"#
        .to_string()
    }

    /// Check values that serde cannot check on its own.
    pub fn validate(&self) -> ConfigResult<()> {
        if !is_identifier(&self.view.name) {
            return Err(ConfigError::Invalid(format!(
                "view.name must be a plain SQL identifier, got '{}'",
                self.view.name
            )));
        }
        if self.documents.patterns.is_empty() {
            return Err(ConfigError::Invalid(
                "documents.patterns must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Database settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

/// Document discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    pub patterns: Vec<String>,
    pub skip_hidden: bool,
    pub follow_links: bool,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            patterns: vec!["*.md".to_string()],
            skip_hidden: true,
            follow_links: true,
        }
    }
}

/// Typed view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub name: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            name: "documents".to_string(),
        }
    }
}

/// Body to keep when a front matter block is present but unparsable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// The whole original text, front matter block included.
    #[default]
    KeepFullText,
    /// Only the text after the closing delimiter.
    BodyOnly,
}

/// Front matter extraction settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub on_malformed: MalformedPolicy,
}
