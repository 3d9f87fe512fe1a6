//! Schema command - show what a load would infer, without writing anything.

use super::{load_config, print_schema};
use anyhow::{Context, Result};
use colored::Colorize;
use mdlex_ingest::SchemaAnalyzer;
use std::path::Path;

pub fn run(dir: &Path, json: bool) -> Result<()> {
    let config = load_config()?;
    let analyzer = SchemaAnalyzer::from_config(&config).context("Invalid document settings")?;

    let report = analyzer.analyze(dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.schema)?);
        return Ok(());
    }

    print_schema(&report);
    println!();

    match report.schema.validate() {
        Ok(_) => println!("{}", "Schema is consistent.".green().bold()),
        Err(conflicts) => {
            println!("{}", conflicts.to_string().red());
        }
    }

    Ok(())
}
