//! In-memory implementation of [`DesignStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and ephemeral
//! sessions. It keeps the encoded document text, not the `Design` value, so
//! every load goes through the same decode path as the durable backends.

use std::collections::HashMap;

use designgraph_core::DesignId;

use crate::error::StorageError;
use crate::traits::DesignStore;

/// In-memory implementation of [`DesignStore`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    records: HashMap<DesignId, String>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, readable or not.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DesignStore for InMemoryStore {
    fn read_record(&self, id: &DesignId) -> Result<Option<String>, StorageError> {
        Ok(self.records.get(id).cloned())
    }

    fn write_record(&mut self, id: &DesignId, document: &str) -> Result<(), StorageError> {
        self.records.insert(*id, document.to_string());
        Ok(())
    }

    fn remove_record(&mut self, id: &DesignId) -> Result<bool, StorageError> {
        Ok(self.records.remove(id).is_some())
    }

    fn scan_records(&self) -> Result<Vec<(String, String)>, StorageError> {
        Ok(self
            .records
            .iter()
            .map(|(id, text)| (id.to_string(), text.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use designgraph_core::{Component, ComponentKind, DeploymentState, DomainType};

    #[test]
    fn test_create_and_load_design() {
        let mut store = InMemoryStore::new();
        let created = store.create("shop").unwrap();

        let loaded = store.load(&created.design_id()).unwrap();
        assert_eq!(loaded, created);
        assert!(loaded.components().is_empty());
        assert!(loaded.updated_at() > loaded.created_at());
    }

    #[test]
    fn test_save_overwrites_and_roundtrips_state() {
        let mut store = InMemoryStore::new();
        let mut design = store.create("shop").unwrap();
        design
            .add_component(Component::new("db", ComponentKind::Rdms, DomainType::Data, "MySQL"))
            .unwrap();
        design.set_component_state("db", DeploymentState::Error, None, Some("disk full".into()));

        let previous = design.updated_at();
        store.save(&mut design).unwrap();
        assert!(design.updated_at() > previous);

        let loaded = store.load(&design.design_id()).unwrap();
        assert_eq!(loaded, design);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_missing_design() {
        let store = InMemoryStore::new();
        let id = DesignId::new();
        match store.load(&id).unwrap_err() {
            StorageError::NotFound(missing) => assert_eq!(missing, id),
            other => panic!("expected NotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_delete_design() {
        let mut store = InMemoryStore::new();
        let id = store.create("to_delete").unwrap().design_id();

        store.delete(&id).unwrap();

        assert!(matches!(store.load(&id), Err(StorageError::NotFound(_))));
        assert!(matches!(store.delete(&id), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_record_is_reported_on_load() {
        let mut store = InMemoryStore::new();
        let id = DesignId::new();
        store.write_record(&id, "{\"name\": \"half\"}").unwrap();

        match store.load(&id).unwrap_err() {
            StorageError::Corrupt { key, reason } => {
                assert_eq!(key, id.to_string());
                assert!(reason.contains("Missing required field: design_id"), "{reason}");
                assert!(reason.contains("Missing required field: connections"), "{reason}");
            }
            other => panic!("expected Corrupt, got: {:?}", other),
        }
    }

    #[test]
    fn test_list_orders_by_most_recent_update() {
        let mut store = InMemoryStore::new();
        let mut alpha = store.create("alpha").unwrap();
        store.create("beta").unwrap();
        store.create("gamma").unwrap();
        store.save(&mut alpha).unwrap();

        let list = store.list().unwrap();
        let names: Vec<&str> = list.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names[0], "alpha");
        assert_eq!(list.len(), 3);
        assert!(list.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));
    }
}
