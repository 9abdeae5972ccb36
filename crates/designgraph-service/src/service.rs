//! DesignService: the coordinator between callers and the
//! core/check/storage crates.
//!
//! Every graph edit runs the same pipeline: load the stored design, apply
//! the edit to that working copy, validate the result, and persist it only
//! if it is valid. A rejected edit leaves the store untouched.

use serde_json::Value;
use tracing::{debug, info, warn};

use designgraph_check::{validate, validate_design, ValidationError};
use designgraph_core::codec;
use designgraph_core::{
    Component, ComponentPatch, ComponentRemoval, ComponentStateInfo, Connection, ConnectionPatch,
    DeploymentState, Design, DesignId, ResolvedGraph,
};
use designgraph_storage::{DesignStore, DesignSummary};

use crate::error::DesignError;

/// The central service coordinating design edits, validation and
/// persistence over a [`DesignStore`].
pub struct DesignService<S: DesignStore> {
    store: S,
}

impl<S: DesignStore> DesignService<S> {
    pub fn new(store: S) -> Self {
        DesignService { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    // -----------------------------------------------------------------------
    // Design lifecycle
    // -----------------------------------------------------------------------

    /// Creates and persists an empty design.
    pub fn create_design(&mut self, name: &str) -> Result<Design, DesignError> {
        let design = self.store.create(name)?;
        info!(design_id = %design.design_id(), name, "design created");
        Ok(design)
    }

    pub fn get_design(&self, id: &DesignId) -> Result<Design, DesignError> {
        Ok(self.store.load(id)?)
    }

    /// Summaries of every readable design, most recently updated first.
    pub fn list_designs(&self) -> Result<Vec<DesignSummary>, DesignError> {
        Ok(self.store.list()?)
    }

    pub fn delete_design(&mut self, id: &DesignId) -> Result<(), DesignError> {
        self.store.delete(id)?;
        info!(design_id = %id, "design deleted");
        Ok(())
    }

    /// Replaces a stored design with `document` wholesale.
    ///
    /// The document's `design_id` is forced to `id`. A document without
    /// `created_at` keeps the stored design's creation time. The document is
    /// validated as-is before it is decoded; nothing is written unless it is
    /// valid.
    pub fn replace_design(&mut self, id: &DesignId, document: Value) -> Result<Design, DesignError> {
        let existing = self.store.load(id)?;

        let mut document = document;
        if let Some(fields) = document.as_object_mut() {
            fields.insert("design_id".to_string(), Value::String(id.to_string()));
            if !fields.contains_key("created_at") {
                fields.insert(
                    "created_at".to_string(),
                    Value::String(existing.created_at().to_rfc3339()),
                );
            }
        }

        let errors = validate(&document);
        if !errors.is_empty() {
            warn!(design_id = %id, errors = errors.len(), "replacement rejected by validation");
            return Err(DesignError::ValidationFailed(errors));
        }

        let mut design = codec::decode(document).map_err(|err| {
            DesignError::ValidationFailed(vec![ValidationError::Undecodable {
                reason: err.to_string(),
            }])
        })?;
        self.store.save(&mut design)?;
        info!(design_id = %id, "design replaced");
        Ok(design)
    }

    // -----------------------------------------------------------------------
    // Component edits
    // -----------------------------------------------------------------------

    pub fn add_component(
        &mut self,
        id: &DesignId,
        component: Component,
    ) -> Result<Component, DesignError> {
        self.mutate(id, "add_component", |design| {
            let added = component.clone();
            design.add_component(component)?;
            Ok(added)
        })
    }

    /// Patches a component. A rename carries its connections and state entry
    /// along.
    pub fn update_component(
        &mut self,
        id: &DesignId,
        name: &str,
        patch: &ComponentPatch,
    ) -> Result<Component, DesignError> {
        self.mutate(id, "update_component", |design| {
            Ok(design.update_component(name, patch)?.clone())
        })
    }

    /// Removes a component and every connection touching it.
    pub fn delete_component(
        &mut self,
        id: &DesignId,
        name: &str,
    ) -> Result<ComponentRemoval, DesignError> {
        self.mutate(id, "delete_component", |design| {
            Ok(design.delete_component(name)?)
        })
    }

    // -----------------------------------------------------------------------
    // Connection edits
    // -----------------------------------------------------------------------

    /// Appends a connection and returns its position in the sequence.
    pub fn add_connection(
        &mut self,
        id: &DesignId,
        source: &str,
        destination: &str,
        label: &str,
        technology: &str,
    ) -> Result<usize, DesignError> {
        self.mutate(id, "add_connection", |design| {
            Ok(design.add_connection(source, destination, label, technology)?)
        })
    }

    pub fn update_connection(
        &mut self,
        id: &DesignId,
        index: usize,
        patch: &ConnectionPatch,
    ) -> Result<Connection, DesignError> {
        self.mutate(id, "update_connection", |design| {
            Ok(design.update_connection(index, patch)?.clone())
        })
    }

    pub fn delete_connection(
        &mut self,
        id: &DesignId,
        index: usize,
    ) -> Result<Connection, DesignError> {
        self.mutate(id, "delete_connection", |design| {
            Ok(design.delete_connection(index)?)
        })
    }

    // -----------------------------------------------------------------------
    // Deployment state
    // -----------------------------------------------------------------------

    /// Records a deployment state for an existing component.
    pub fn set_component_state(
        &mut self,
        id: &DesignId,
        name: &str,
        state: DeploymentState,
        resource_id: Option<String>,
        error_message: Option<String>,
    ) -> Result<ComponentStateInfo, DesignError> {
        self.mutate(id, "set_component_state", |design| {
            if !design.contains_component(name) {
                return Err(DesignError::NotFound(format!("component '{name}'")));
            }
            Ok(design
                .set_component_state(name, state, resource_id, error_message)
                .clone())
        })
    }

    /// Returns the deployment state of `name`.
    ///
    /// The first read of an existing component with no entry creates an
    /// `Undeployed` entry and persists it. The graph is unchanged by that
    /// write, so it is not gated on validation. An entry retained from a
    /// deleted component is returned as-is; a name with neither a component
    /// nor an entry is `NotFound`.
    pub fn component_state(
        &mut self,
        id: &DesignId,
        name: &str,
    ) -> Result<ComponentStateInfo, DesignError> {
        let mut design = self.store.load(id)?;
        if let Some(info) = design.peek_component_state(name) {
            return Ok(info.clone());
        }
        if !design.contains_component(name) {
            return Err(DesignError::NotFound(format!("state for component '{name}'")));
        }
        let info = design.component_state_or_init(name).clone();
        self.store.save(&mut design)?;
        info!(design_id = %id, component = name, "deployment state initialized");
        Ok(info)
    }

    // -----------------------------------------------------------------------
    // Checks and derived views
    // -----------------------------------------------------------------------

    /// Validates the stored design. An empty result means it is valid.
    pub fn validate_design(&self, id: &DesignId) -> Result<Vec<ValidationError>, DesignError> {
        let design = self.store.load(id)?;
        Ok(validate_design(&design))
    }

    /// The name-resolved graph of a valid stored design.
    pub fn resolved_graph(&self, id: &DesignId) -> Result<ResolvedGraph, DesignError> {
        let design = self.store.load(id)?;
        let errors = validate_design(&design);
        if !errors.is_empty() {
            return Err(DesignError::ValidationFailed(errors));
        }
        Ok(ResolvedGraph::from_design(&design)?)
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    /// Load, edit, validate, then persist or reject.
    fn mutate<R>(
        &mut self,
        id: &DesignId,
        operation: &'static str,
        edit: impl FnOnce(&mut Design) -> Result<R, DesignError>,
    ) -> Result<R, DesignError> {
        let mut design = self.store.load(id)?;
        let outcome = edit(&mut design).map_err(|err| {
            debug!(design_id = %id, operation, error = %err, "edit refused");
            err
        })?;

        let errors = validate_design(&design);
        if !errors.is_empty() {
            warn!(
                design_id = %id,
                operation,
                errors = errors.len(),
                "edit rejected by validation"
            );
            return Err(DesignError::ValidationFailed(errors));
        }

        self.store.save(&mut design)?;
        info!(
            design_id = %id,
            operation,
            updated_at = %design.updated_at(),
            "edit committed"
        );
        Ok(outcome)
    }
}
