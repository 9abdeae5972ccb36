//! Storage error types for designgraph-storage.
//!
//! [`StorageError`] covers all anticipated failure modes in the storage layer:
//! missing records, corrupt records, encoding, and backend I/O.

use thiserror::Error;

use designgraph_core::{CodecError, DesignId};

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No record exists for the given design ID.
    #[error("design not found: {0}")]
    NotFound(DesignId),

    /// A stored record could not be parsed or lacks required fields.
    #[error("design {key} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    /// A design could not be encoded for writing.
    #[error("encoding error: {0}")]
    Encoding(#[from] CodecError),

    /// File system failure in the directory backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite failure in the SQLite backend.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Schema migration failed while opening a SQLite database.
    #[error("migration error: {0}")]
    Migration(String),
}
