//! Storage abstraction for design graphs.
//!
//! Provides the [`DesignStore`] trait defining the storage contract, plus
//! three backends: [`DirectoryStore`] (one JSON file per design, the
//! reference layout), [`SqliteStore`], and [`InMemoryStore`].
//!
//! # Architecture
//!
//! The storage layer has a two-layer API:
//! - **Record** methods (read/write/remove/scan of encoded documents keyed by
//!   design ID) are the only thing a backend implements.
//! - **Design** methods (`create`, `load`, `save`, `delete`, `list`) are
//!   provided by the trait on top of the record layer, so every backend shares
//!   the same NotFound/Corrupt/ordering semantics.
//!
//! The store does not validate designs; that is the caller's job at the
//! mutation boundary.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: DesignSummary listing type
//! - [`traits`]: DesignStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`directory`]: DirectoryStore implementation
//! - [`schema`]: SQL schema and migration setup
//! - [`sqlite`]: SqliteStore implementation

pub mod directory;
pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use directory::DirectoryStore;
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::DesignStore;
pub use types::DesignSummary;
