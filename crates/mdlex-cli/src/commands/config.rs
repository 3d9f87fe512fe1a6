//! Configuration commands.

use super::{get_paths, load_config};
use anyhow::{Context, Result};
use colored::Colorize;
use mdlex_config::{Config, DatabaseLocation};

pub fn show(db_path: Option<&str>) -> Result<()> {
    let paths = get_paths()?;

    println!("{}", "Current Configuration".cyan().bold());
    println!("{}", "─".repeat(50));

    if paths.config_file.exists() {
        let contents = std::fs::read_to_string(&paths.config_file)
            .context("Failed to read config file")?;
        println!("{}", contents);
    } else {
        println!(
            "{} No config file at {}, using defaults:",
            "Note:".yellow(),
            paths.config_file.display()
        );
        println!();
        println!("{}", Config::default_config_string());
    }

    let config = load_config()?;
    let location = DatabaseLocation::from_env(db_path, &config);
    println!("{}", "─".repeat(50));
    println!(
        "Database: {} (from {})",
        location.path.display().to_string().green(),
        location.source
    );

    Ok(())
}

pub fn path() -> Result<()> {
    let paths = get_paths()?;
    println!("{}", paths.config_file.display());
    Ok(())
}
