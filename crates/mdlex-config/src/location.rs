//! Database location resolution.

use crate::config::Config;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable consulted for the database path.
pub const DB_PATH_ENV: &str = "MDLEX_DB_PATH";

/// Database file used when nothing else names one.
pub const DEFAULT_DB_FILE: &str = "mdlex.db";

/// Where the resolved database path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Argument,
    Environment,
    ConfigFile,
    Default,
}

impl LocationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSource::Argument => "command line",
            LocationSource::Environment => DB_PATH_ENV,
            LocationSource::ConfigFile => "config file",
            LocationSource::Default => "default",
        }
    }
}

impl std::fmt::Display for LocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A database path resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseLocation {
    pub path: PathBuf,
    pub source: LocationSource,
}

impl DatabaseLocation {
    /// Resolve with precedence: argument, environment, config file, default.
    /// Empty strings are treated as unset.
    pub fn resolve(argument: Option<&str>, environment: Option<&str>, config: &Config) -> Self {
        let candidates = [
            (argument, LocationSource::Argument),
            (environment, LocationSource::Environment),
            (config.database.path.as_deref(), LocationSource::ConfigFile),
        ];

        let location = candidates
            .into_iter()
            .find_map(|(value, source)| {
                value
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| Self {
                        path: PathBuf::from(v),
                        source,
                    })
            })
            .unwrap_or_else(|| Self {
                path: PathBuf::from(DEFAULT_DB_FILE),
                source: LocationSource::Default,
            });

        debug!(
            "Database location: {} (from {})",
            location.path.display(),
            location.source
        );
        location
    }

    /// Resolve reading the environment variable from the current process.
    pub fn from_env(argument: Option<&str>, config: &Config) -> Self {
        let environment = std::env::var(DB_PATH_ENV).ok();
        Self::resolve(argument, environment.as_deref(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_path(path: Option<&str>) -> Config {
        let mut config = Config::default();
        config.database.path = path.map(String::from);
        config
    }

    #[test]
    fn test_default_location() {
        let loc = DatabaseLocation::resolve(None, None, &Config::default());
        assert_eq!(loc.path, PathBuf::from("mdlex.db"));
        assert_eq!(loc.source, LocationSource::Default);
    }

    #[test]
    fn test_argument_wins() {
        let config = config_with_path(Some("config.db"));
        let loc = DatabaseLocation::resolve(Some("custom.db"), Some("env.db"), &config);
        assert_eq!(loc.path, PathBuf::from("custom.db"));
        assert_eq!(loc.source, LocationSource::Argument);
    }

    #[test]
    fn test_environment_beats_config() {
        let config = config_with_path(Some("config.db"));
        let loc = DatabaseLocation::resolve(None, Some("env.db"), &config);
        assert_eq!(loc.path, PathBuf::from("env.db"));
        assert_eq!(loc.source, LocationSource::Environment);
    }

    #[test]
    fn test_config_beats_default() {
        let config = config_with_path(Some("config.db"));
        let loc = DatabaseLocation::resolve(None, None, &config);
        assert_eq!(loc.path, PathBuf::from("config.db"));
        assert_eq!(loc.source, LocationSource::ConfigFile);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let loc = DatabaseLocation::resolve(Some(""), Some("  "), &Config::default());
        assert_eq!(loc.source, LocationSource::Default);
    }
}
