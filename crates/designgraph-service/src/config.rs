//! Backend selection.
//!
//! Reads configuration from environment variables:
//! - `DESIGNGRAPH_STORE`: `dir` (default), `sqlite`, or `memory`
//! - `DESIGNGRAPH_PATH`: directory or database path (default: "designs" for
//!   `dir`, "designs.db" for `sqlite`)

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use designgraph_storage::{DesignStore, DirectoryStore, InMemoryStore, SqliteStore, StorageError};

pub const STORE_ENV: &str = "DESIGNGRAPH_STORE";
pub const PATH_ENV: &str = "DESIGNGRAPH_PATH";

/// Which backend to open, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// One JSON file per design under this directory.
    Directory(PathBuf),
    /// A SQLite database file.
    Sqlite(PathBuf),
    /// Nothing persisted beyond the process.
    Memory,
}

/// Backend names accepted in `DESIGNGRAPH_STORE` and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Directory,
    Sqlite,
    Memory,
}

impl BackendKind {
    fn default_path(self) -> Option<PathBuf> {
        match self {
            BackendKind::Directory => Some(PathBuf::from("designs")),
            BackendKind::Sqlite => Some(PathBuf::from("designs.db")),
            BackendKind::Memory => None,
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dir" | "directory" | "fs" => Ok(BackendKind::Directory),
            "sqlite" | "db" => Ok(BackendKind::Sqlite),
            "memory" | "mem" => Ok(BackendKind::Memory),
            other => Err(format!(
                "unknown store backend '{other}' (expected dir, sqlite, or memory)"
            )),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Directory => f.write_str("dir"),
            BackendKind::Sqlite => f.write_str("sqlite"),
            BackendKind::Memory => f.write_str("memory"),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Directory(PathBuf::from("designs"))
    }
}

impl StoreConfig {
    /// Builds a config from a backend kind and an optional path override.
    pub fn new(kind: BackendKind, path: Option<PathBuf>) -> Self {
        let path = path.or_else(|| kind.default_path());
        match (kind, path) {
            (BackendKind::Directory, Some(path)) => StoreConfig::Directory(path),
            (BackendKind::Sqlite, Some(path)) => StoreConfig::Sqlite(path),
            _ => StoreConfig::Memory,
        }
    }

    /// Reads `DESIGNGRAPH_STORE` and `DESIGNGRAPH_PATH`.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let kind = match lookup(STORE_ENV) {
            Some(raw) => raw.parse()?,
            None => BackendKind::Directory,
        };
        let path = lookup(PATH_ENV)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self::new(kind, path))
    }

    /// Opens the configured backend.
    pub fn open(&self) -> Result<Box<dyn DesignStore>, StorageError> {
        Ok(match self {
            StoreConfig::Directory(path) => Box::new(DirectoryStore::open(path)?),
            StoreConfig::Sqlite(path) => Box::new(SqliteStore::new(&path.to_string_lossy())?),
            StoreConfig::Memory => Box::new(InMemoryStore::new()),
        })
    }
}

impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreConfig::Directory(path) => write!(f, "dir:{}", path.display()),
            StoreConfig::Sqlite(path) => write!(f, "sqlite:{}", path.display()),
            StoreConfig::Memory => f.write_str("memory"),
        }
    }
}
