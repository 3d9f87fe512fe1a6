//! Database statistics operations.

use crate::database::Database;
use crate::error::DbResult;
use mdlex_core::DatabaseStats;

impl Database {
    /// Get database statistics, including the columns of the named view.
    pub fn get_stats(&self, view_name: &str) -> DbResult<DatabaseStats> {
        let (total_documents, documents_with_metadata, database_size_bytes) = {
            let conn = self.conn()?;

            let total_documents: i64 =
                conn.query_row("SELECT COUNT(*) FROM documents_raw", [], |row| row.get(0))?;

            let documents_with_metadata: i64 = conn.query_row(
                "SELECT COUNT(*) FROM documents_raw WHERE metadata != '{}'",
                [],
                |row| row.get(0),
            )?;

            // Database size (page_count * page_size)
            let page_count: i64 = conn.pragma_query_value(None, "page_count", |row| row.get(0))?;
            let page_size: i64 = conn.pragma_query_value(None, "page_size", |row| row.get(0))?;

            (total_documents, documents_with_metadata, page_count * page_size)
        };

        let view_columns = if self.view_exists(view_name)? {
            self.view_columns(view_name)?
        } else {
            Vec::new()
        };

        let integrity_ok = self.integrity_check()?;

        Ok(DatabaseStats {
            total_documents,
            documents_with_metadata,
            view_name: view_name.to_string(),
            view_columns,
            database_size_bytes,
            integrity_ok,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdlex_core::RawDocument;
    use serde_json::json;

    #[test]
    fn test_get_stats() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_document(&RawDocument::new("/a.md", json!({"title": "A"}), ""))
            .unwrap();
        db.upsert_document(&RawDocument::new("/b.md", json!({}), "plain"))
            .unwrap();

        let stats = db.get_stats("documents").unwrap();

        assert_eq!(stats.total_documents, 2);
        assert_eq!(stats.documents_with_metadata, 1);
        assert!(stats.view_columns.is_empty());
        assert!(stats.database_size_bytes > 0);
        assert!(stats.integrity_ok);
    }
}
