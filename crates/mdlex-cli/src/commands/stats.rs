//! Stats command - show database statistics.

use super::{format_size, load_config, open_database};
use anyhow::Result;
use colored::Colorize;

pub fn run(db_path: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let (db, location) = open_database(db_path, &config)?;
    run_with_db(&db, &config.view.name, &location.path.display().to_string())
}

/// Run stats with an existing database connection.
pub fn run_with_db(db: &mdlex_db::Database, view_name: &str, label: &str) -> Result<()> {
    let stats = db.get_stats(view_name)?;

    println!("{}", "mdlex Statistics".cyan().bold());
    println!("{}", "─".repeat(50));

    println!();
    println!("{}", "Documents".white().bold());
    println!("  Total: {}", stats.total_documents.to_string().green());
    println!("  With front matter: {}", stats.documents_with_metadata);

    println!();
    println!("{}", "View".white().bold());
    if stats.view_columns.is_empty() {
        println!(
            "  '{}' {}",
            stats.view_name,
            "not created yet; run 'mdlex load <dir>'".yellow()
        );
    } else {
        println!("  Name: {}", stats.view_name);
        println!("  Columns: {}", stats.view_columns.join(", "));
    }

    println!();
    println!("{}", "Storage".white().bold());
    println!("  Database: {}", label);
    println!("  Size: {}", format_size(stats.database_size_bytes));
    if stats.integrity_ok {
        println!("  Integrity: {}", "ok".green());
    } else {
        println!("  Integrity: {}", "FAILED".red().bold());
    }

    Ok(())
}
