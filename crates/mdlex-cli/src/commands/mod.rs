//! CLI command implementations.

pub mod config;
pub mod init;
pub mod load;
pub mod query;
pub mod schema;
pub mod stats;

use anyhow::{Context, Result};
use colored::Colorize;
use mdlex_config::{AppPaths, Config, DatabaseLocation};
use mdlex_db::Database;
use mdlex_ingest::SchemaReport;

/// Get the application paths.
pub fn get_paths() -> Result<AppPaths> {
    AppPaths::new().context("Failed to determine application directories")
}

/// Load the user's configuration, falling back to defaults when there is none.
pub fn load_config() -> Result<Config> {
    Config::load().context("Failed to load config")
}

/// Open the database at the location resolved from the flag, environment and config.
pub fn open_database(db_path: Option<&str>, config: &Config) -> Result<(Database, DatabaseLocation)> {
    let location = DatabaseLocation::from_env(db_path, config);
    let db = Database::open(&location.path)
        .with_context(|| format!("Failed to open database {}", location.path.display()))?;
    Ok((db, location))
}

/// Print every key with the types it was seen with.
pub fn print_schema(report: &SchemaReport) {
    println!(
        "{} ({} documents, {} keys)",
        "Schema".cyan().bold(),
        report.documents_scanned,
        report.schema.len()
    );
    println!("{}", "─".repeat(50));

    if report.schema.is_empty() {
        println!("  {}", "No front matter keys found.".yellow());
    }

    for (key, tags) in report.schema.fields() {
        let names: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
        let types = names.join(", ");
        if tags.len() > 1 {
            println!("  {}: {}", key.red().bold(), types.red());
        } else {
            println!("  {}: {}", key, types.green());
        }
    }

    if !report.failures.is_empty() {
        println!();
        println!("{} {} files", "Skipped:".yellow().bold(), report.failures.len());
        for failure in &report.failures {
            println!("  {}", failure);
        }
    }
}

/// Format a file size in human-readable form.
pub fn format_size(bytes: i64) -> String {
    const KB: i64 = 1024;
    const MB: i64 = KB * 1024;
    const GB: i64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
