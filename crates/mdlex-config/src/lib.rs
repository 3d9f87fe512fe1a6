//! Mdlex Config - Configuration management for mdlex.

mod config;
mod error;
mod location;
mod paths;

pub use config::*;
pub use error::{ConfigError, ConfigResult};
pub use location::{DatabaseLocation, LocationSource, DB_PATH_ENV, DEFAULT_DB_FILE};
pub use paths::AppPaths;
