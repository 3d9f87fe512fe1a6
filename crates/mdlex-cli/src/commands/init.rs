//! Initialize mdlex.

use super::{get_paths, load_config, open_database};
use anyhow::{Context, Result};
use colored::Colorize;
use mdlex_config::Config;

pub fn run(db_path: Option<&str>) -> Result<()> {
    let paths = get_paths()?;

    if paths.is_initialized() {
        println!("{} mdlex is already initialized.", "Note:".yellow().bold());
        println!("  Config: {}", paths.config_file.display());
    } else {
        println!("{}", "Initializing mdlex...".cyan().bold());

        paths
            .ensure_dirs()
            .context("Failed to create directories")?;
        println!("  {} Created directories", "✓".green());

        Config::create_default_file(&paths.config_file)
            .context("Failed to create config file")?;
        println!(
            "  {} Created config: {}",
            "✓".green(),
            paths.config_file.display()
        );
    }

    let config = load_config()?;
    let (_db, location) = open_database(db_path, &config).context("Failed to initialize database")?;
    println!(
        "  {} Database ready: {} ({})",
        "✓".green(),
        location.path.display(),
        location.source
    );

    println!();
    println!("Next steps:");
    println!("  1. Load a directory: {}", "mdlex load ~/notes".cyan());
    println!(
        "  2. Query it: {}",
        "mdlex query \"SELECT path, title FROM documents\"".cyan()
    );

    Ok(())
}
