//! Load command - analyze, validate, build the view and ingest.

use super::{load_config, open_database, print_schema};
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use mdlex_config::Config;
use mdlex_ingest::{Loader, SchemaAnalyzer};
use std::path::Path;

pub fn run(dir: &Path, db_path: Option<&str>) -> Result<()> {
    let config = load_config()?;
    run_with_config(dir, db_path, &config)
}

/// Load `dir` with an already loaded configuration.
///
/// The database is only opened once the schema has validated, so a
/// rejected load leaves no database file behind.
pub fn run_with_config(dir: &Path, db_path: Option<&str>, config: &Config) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let analyzer = SchemaAnalyzer::from_config(config).context("Invalid document settings")?;

    println!("{} {}", "Scanning:".cyan(), dir.display());
    let report = analyzer.analyze(dir)?;
    print_schema(&report);
    println!();

    let schema = report.schema.validate()?;

    let (db, location) = open_database(db_path, config)?;
    let loader = Loader::new(db, config).context("Invalid document settings")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Loading into {}", location.path.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let (view, ingest) = loader.apply(dir, &schema)?;

    pb.finish_and_clear();

    println!(
        "{} view '{}' with {} columns",
        "Created:".green().bold(),
        view.name,
        view.columns.len()
    );
    println!(
        "{} {} documents",
        "Processed:".green().bold(),
        ingest.processed
    );
    if !ingest.failures.is_empty() {
        println!("{} {} files", "Failed:".red().bold(), ingest.failures.len());
        for failure in &ingest.failures {
            println!("  {}", failure);
        }
    }
    println!("  Database: {} ({})", location.path.display(), location.source);

    Ok(())
}
