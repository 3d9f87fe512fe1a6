//! Typed view installation.

use crate::database::Database;
use crate::error::DbResult;
use mdlex_core::ViewDefinition;
use rusqlite::params;
use tracing::info;

impl Database {
    /// Replace any existing view of the same name with `view`.
    ///
    /// Drop and create happen in one transaction, so readers never observe a
    /// missing view.
    pub fn install_view(&self, view: &ViewDefinition) -> DbResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute_batch(&view.drop_sql())?;
        tx.execute_batch(&view.create_sql())?;
        tx.commit()?;

        info!(
            "Installed view '{}' with {} columns",
            view.name,
            view.columns.len()
        );
        Ok(())
    }

    /// Check whether a view with this name exists.
    pub fn view_exists(&self, name: &str) -> DbResult<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'view' AND name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Column names of a view (or table), in declaration order.
    pub fn view_columns(&self, name: &str) -> DbResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let columns = stmt
            .query_map(params![name], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(columns)
    }
}
