//! The [`DesignStore`] trait defining the storage contract for designs.
//!
//! Two-layer API design:
//! - **Record** methods form the trait foundation. A record is the canonical
//!   JSON text of one design, keyed by its [`DesignId`]. These are the only
//!   methods a backend implements.
//! - **Design** methods (`create`, `load`, `save`, `delete`, `list`) are
//!   provided on top of the record layer.
//!
//! The trait is synchronous: each call runs to completion with no suspension
//! point other than the backend's own I/O. There is no cross-call locking;
//! two saves of the same design race and the last write wins.

use tracing::{debug, warn};

use designgraph_check::required_field_errors;
use designgraph_check::ValidationError;
use designgraph_core::codec;
use designgraph_core::{Design, DesignId};

use crate::error::StorageError;
use crate::types::DesignSummary;

/// The storage contract for designs.
pub trait DesignStore {
    // -------------------------------------------------------------------
    // Record layer (implemented by backends)
    // -------------------------------------------------------------------

    /// Returns the stored document for `id`, or `None` if there is no record.
    fn read_record(&self, id: &DesignId) -> Result<Option<String>, StorageError>;

    /// Writes the document for `id`, replacing any existing record.
    fn write_record(&mut self, id: &DesignId, document: &str) -> Result<(), StorageError>;

    /// Removes the record for `id`. Returns `false` if there was none.
    fn remove_record(&mut self, id: &DesignId) -> Result<bool, StorageError>;

    /// Returns every stored record as `(key, document)` pairs in no
    /// particular order. Keys are the backend's own record names and need not
    /// parse as design IDs.
    fn scan_records(&self) -> Result<Vec<(String, String)>, StorageError>;

    // -------------------------------------------------------------------
    // Design layer (provided)
    // -------------------------------------------------------------------

    /// Creates and persists an empty design named `name`.
    fn create(&mut self, name: &str) -> Result<Design, StorageError> {
        let mut design = Design::new(name);
        self.save(&mut design)?;
        debug!(design_id = %design.design_id(), name, "created design");
        Ok(design)
    }

    /// Loads a design.
    ///
    /// Fails with `NotFound` if there is no record and `Corrupt` if the
    /// record does not decode or carries a different `design_id`.
    /// Referential validity is not checked.
    fn load(&self, id: &DesignId) -> Result<Design, StorageError> {
        let text = self
            .read_record(id)?
            .ok_or(StorageError::NotFound(*id))?;
        let design = decode_record(&id.to_string(), &text)?;
        debug!(design_id = %id, "loaded design");
        Ok(design)
    }

    /// Stamps `updated_at` and writes the full design, overwriting any prior
    /// record. Does not validate.
    fn save(&mut self, design: &mut Design) -> Result<(), StorageError> {
        design.touch();
        let text = codec::to_string(design)?;
        self.write_record(&design.design_id(), &text)?;
        debug!(
            design_id = %design.design_id(),
            updated_at = %design.updated_at(),
            "saved design"
        );
        Ok(())
    }

    /// Permanently removes a design. Fails with `NotFound` if absent.
    fn delete(&mut self, id: &DesignId) -> Result<(), StorageError> {
        if !self.remove_record(id)? {
            return Err(StorageError::NotFound(*id));
        }
        debug!(design_id = %id, "deleted design");
        Ok(())
    }

    /// Summaries of every readable design, most recently updated first.
    ///
    /// Records that fail to decode are skipped.
    fn list(&self) -> Result<Vec<DesignSummary>, StorageError> {
        let mut summaries: Vec<DesignSummary> = self
            .scan_records()?
            .into_iter()
            .filter_map(|(key, text)| match decode_record(&key, &text) {
                Ok(design) => Some(DesignSummary::from(&design)),
                Err(err) => {
                    warn!(record = %key, error = %err, "skipping unreadable design record");
                    None
                }
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.design_id.cmp(&b.design_id))
        });
        Ok(summaries)
    }
}

impl<S: DesignStore + ?Sized> DesignStore for Box<S> {
    fn read_record(&self, id: &DesignId) -> Result<Option<String>, StorageError> {
        (**self).read_record(id)
    }

    fn write_record(&mut self, id: &DesignId, document: &str) -> Result<(), StorageError> {
        (**self).write_record(id, document)
    }

    fn remove_record(&mut self, id: &DesignId) -> Result<bool, StorageError> {
        (**self).remove_record(id)
    }

    fn scan_records(&self) -> Result<Vec<(String, String)>, StorageError> {
        (**self).scan_records()
    }
}

/// Parses, shape-checks and decodes one stored record.
///
/// The decoded `design_id` must match the record key.
fn decode_record(key: &str, text: &str) -> Result<Design, StorageError> {
    let corrupt = |reason: String| StorageError::Corrupt {
        key: key.to_string(),
        reason,
    };

    let document = codec::parse_document(text).map_err(|e| corrupt(e.to_string()))?;
    let missing = required_field_errors(&document);
    if !missing.is_empty() {
        return Err(corrupt(ValidationError::messages(&missing).join("; ")));
    }
    let design = codec::decode(document).map_err(|e| corrupt(e.to_string()))?;
    if key.parse::<DesignId>().ok() != Some(design.design_id()) {
        return Err(corrupt(format!(
            "record holds design_id {}",
            design.design_id()
        )));
    }
    Ok(design)
}
