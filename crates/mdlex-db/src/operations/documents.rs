//! Raw document operations.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use mdlex_core::{RawDocument, StoredDocument};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::debug;

const UPSERT_SQL: &str = r#"
    INSERT INTO documents_raw (path, metadata, body)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(path) DO UPDATE SET
        metadata = excluded.metadata,
        body = excluded.body
"#;

fn upsert(conn: &Connection, doc: &RawDocument) -> DbResult<()> {
    let mut stmt = conn.prepare_cached(UPSERT_SQL)?;
    stmt.execute(params![doc.path, doc.metadata.to_string(), doc.body])?;
    Ok(())
}

/// A set of upserts that becomes visible all at once on commit.
pub struct DocumentBatch<'conn> {
    tx: Transaction<'conn>,
    written: usize,
}

impl DocumentBatch<'_> {
    /// Insert the document, or replace metadata and body of the row with the same path.
    pub fn upsert(&mut self, doc: &RawDocument) -> DbResult<()> {
        upsert(&self.tx, doc)?;
        self.written += 1;
        Ok(())
    }
}

impl Database {
    /// Insert or replace a single document.
    pub fn upsert_document(&self, doc: &RawDocument) -> DbResult<()> {
        let conn = self.conn()?;
        upsert(&conn, doc)
    }

    /// Run `f` inside one transaction. Everything it upserted is committed
    /// when it returns `Ok`; on `Err` nothing is kept.
    ///
    /// `f` must not use other pooled connections of this handle.
    pub fn in_batch<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut DocumentBatch<'_>) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(DbError::from)?;
        let mut batch = DocumentBatch { tx, written: 0 };

        let out = f(&mut batch)?;

        debug!("Committing batch of {} documents", batch.written);
        batch.tx.commit().map_err(DbError::from)?;
        Ok(out)
    }

    /// Get a document by its path.
    pub fn get_document(&self, path: &str) -> DbResult<Option<StoredDocument>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, path, metadata, body FROM documents_raw WHERE path = ?1",
                params![path],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, path, metadata, body)) => Ok(Some(StoredDocument {
                id,
                path,
                metadata: serde_json::from_str(&metadata)?,
                body,
            })),
            None => Ok(None),
        }
    }

    /// Count rows in the raw table.
    pub fn count_documents(&self) -> DbResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM documents_raw", [], |row| row.get(0))?;
        Ok(count)
    }
}
