//! Directory-of-files implementation of [`DesignStore`].
//!
//! [`DirectoryStore`] keeps one `<design_id>.json` file per design under a
//! root directory. Writes go to a temporary file in the same directory and
//! are renamed into place, so a reader never observes a half-written record.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::warn;

use designgraph_core::DesignId;

use crate::error::StorageError;
use crate::traits::DesignStore;

const EXTENSION: &str = "json";

/// File-backed implementation of [`DesignStore`].
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(DirectoryStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file holding the record for `id`.
    pub fn path_for(&self, id: &DesignId) -> PathBuf {
        self.root.join(format!("{id}.{EXTENSION}"))
    }
}

impl DesignStore for DirectoryStore {
    fn read_record(&self, id: &DesignId) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(id)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_record(&mut self, id: &DesignId, document: &str) -> Result<(), StorageError> {
        let mut staged = NamedTempFile::new_in(&self.root)?;
        staged.write_all(document.as_bytes())?;
        staged.as_file().sync_all()?;
        staged
            .persist(self.path_for(id))
            .map_err(|err| StorageError::Io(err.error))?;
        Ok(())
    }

    fn remove_record(&mut self, id: &DesignId) -> Result<bool, StorageError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn scan_records(&self) -> Result<Vec<(String, String)>, StorageError> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let key = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            match fs::read_to_string(&path) {
                Ok(text) => records.push((key, text)),
                // Vanished between read_dir and read, or unreadable.
                Err(err) => warn!(path = %path.display(), error = %err, "skipping design file"),
            }
        }
        Ok(records)
    }
}
