//! SQLite implementation of [`DesignStore`].
//!
//! [`SqliteStore`] is a key-value table: the design ID is the primary key and
//! the canonical JSON document is stored as TEXT.

use rusqlite::{params, Connection, OptionalExtension};

use designgraph_core::DesignId;

use crate::error::StorageError;
use crate::traits::DesignStore;

/// SQLite-backed implementation of [`DesignStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }
}

impl DesignStore for SqliteStore {
    fn read_record(&self, id: &DesignId) -> Result<Option<String>, StorageError> {
        let document = self
            .conn
            .query_row(
                "SELECT document FROM designs WHERE design_id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(document)
    }

    fn write_record(&mut self, id: &DesignId, document: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO designs (design_id, document) VALUES (?1, ?2)
             ON CONFLICT(design_id) DO UPDATE SET document = excluded.document",
            params![id.to_string(), document],
        )?;
        Ok(())
    }

    fn remove_record(&mut self, id: &DesignId) -> Result<bool, StorageError> {
        let removed = self.conn.execute(
            "DELETE FROM designs WHERE design_id = ?1",
            params![id.to_string()],
        )?;
        Ok(removed > 0)
    }

    fn scan_records(&self) -> Result<Vec<(String, String)>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT design_id, document FROM designs")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
