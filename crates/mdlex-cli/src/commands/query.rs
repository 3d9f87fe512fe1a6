//! Query command - run read-only SQL against the database.

use super::{load_config, open_database};
use anyhow::{Context, Result};
use mdlex_db::parse_param;

pub fn run(sql: &str, params: &[String], db_path: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let (db, _) = open_database(db_path, &config)?;

    let params = params
        .iter()
        .map(|p| parse_param(p))
        .collect::<Result<Vec<_>, _>>()?;
    let rows = db.query(sql, &params).context("Query failed")?;

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
