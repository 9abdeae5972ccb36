//! Design: the aggregate owning one infrastructure graph.
//!
//! [`Design`] is the single entry point for editing a graph. Components are
//! referenced by name everywhere else in the aggregate (connection endpoints,
//! state keys), so every edit that touches a name keeps those references in
//! step:
//!
//! - a rename rewrites matching connection endpoints and moves the state
//!   entry;
//! - a delete removes every connection touching the component.
//!
//! Failed edits leave the design unchanged.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentPatch};
use crate::connection::{Connection, ConnectionPatch, Endpoint};
use crate::error::CoreError;
use crate::id::DesignId;
use crate::state::{ComponentStateInfo, DeploymentState, StateTracker};

/// One infrastructure design graph.
///
/// Field order here is the canonical field order of the encoded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Design {
    design_id: DesignId,
    name: String,
    components: Vec<Component>,
    connections: Vec<Connection>,
    #[serde(default)]
    component_states: StateTracker,
    #[serde(default, deserialize_with = "crate::timestamp::deserialize")]
    created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "crate::timestamp::deserialize")]
    updated_at: DateTime<Utc>,
}

/// What [`Design::delete_component`] took out of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRemoval {
    pub component: Component,
    /// Connections removed because they touched the component, in their
    /// former sequence order.
    pub detached: Vec<Connection>,
}

impl Design {
    /// Creates an empty design with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Design {
            design_id: DesignId::new(),
            name: name.into(),
            components: Vec::new(),
            connections: Vec::new(),
            component_states: StateTracker::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Constructs a `Design` from all its parts without checking invariants.
    ///
    /// Used to reconstruct stored or externally supplied designs; run the
    /// validator before trusting the result.
    pub fn from_parts(
        design_id: DesignId,
        name: String,
        components: Vec<Component>,
        connections: Vec<Connection>,
        component_states: StateTracker,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Design {
            design_id,
            name,
            components,
            connections,
            component_states,
            created_at,
            updated_at,
        }
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn design_id(&self) -> DesignId {
        self.design_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn component_states(&self) -> &StateTracker {
        &self.component_states
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Looks up a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn contains_component(&self, name: &str) -> bool {
        self.component(name).is_some()
    }

    /// Connections with `name` at either end, paired with their positions.
    pub fn connections_touching<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Connection)> + 'a {
        self.connections
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.touches(name))
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.components.iter().position(|c| c.name == name)
    }

    // -----------------------------------------------------------------------
    // Design-level edits
    // -----------------------------------------------------------------------

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Stamps `updated_at` with the current time.
    ///
    /// The new value is strictly later than both the previous `updated_at`
    /// and `created_at`, even if the clock has not advanced or has gone
    /// backwards.
    pub fn touch(&mut self) -> DateTime<Utc> {
        let floor = self.updated_at.max(self.created_at);
        let now = Utc::now();
        self.updated_at = if now > floor {
            now
        } else {
            floor + Duration::microseconds(1)
        };
        self.updated_at
    }

    // -----------------------------------------------------------------------
    // Component edits
    // -----------------------------------------------------------------------

    /// Appends a component. Fails with `DuplicateName` if the name is taken.
    pub fn add_component(&mut self, component: Component) -> Result<(), CoreError> {
        if self.contains_component(&component.name) {
            return Err(CoreError::DuplicateName {
                name: component.name,
            });
        }
        self.components.push(component);
        Ok(())
    }

    /// Applies `patch` to the component called `name`.
    ///
    /// A rename is checked for collisions before anything is touched; when it
    /// goes through, connection endpoints and the state entry follow the
    /// component to its new name.
    pub fn update_component(
        &mut self,
        name: &str,
        patch: &ComponentPatch,
    ) -> Result<&Component, CoreError> {
        let index = self
            .position_of(name)
            .ok_or_else(|| CoreError::ComponentNotFound {
                name: name.to_string(),
            })?;

        if let Some(new_name) = patch.renames(name) {
            if self.contains_component(new_name) {
                return Err(CoreError::DuplicateName {
                    name: new_name.to_string(),
                });
            }
            let new_name = new_name.to_string();
            for connection in &mut self.connections {
                connection.rename_endpoint(name, &new_name);
            }
            self.component_states.rename(name, &new_name);
            self.components[index].name = new_name;
        }

        patch.apply_attributes(&mut self.components[index]);
        Ok(&self.components[index])
    }

    /// Removes a component and every connection touching it.
    ///
    /// The component's state entry is kept.
    pub fn delete_component(&mut self, name: &str) -> Result<ComponentRemoval, CoreError> {
        let index = self
            .position_of(name)
            .ok_or_else(|| CoreError::ComponentNotFound {
                name: name.to_string(),
            })?;
        let component = self.components.remove(index);

        let (detached, kept): (Vec<Connection>, Vec<Connection>) = self
            .connections
            .drain(..)
            .partition(|c| c.touches(name));
        self.connections = kept;

        Ok(ComponentRemoval {
            component,
            detached,
        })
    }

    // -----------------------------------------------------------------------
    // Connection edits
    // -----------------------------------------------------------------------

    /// Appends a connection and returns its position.
    ///
    /// Both endpoints must name existing components.
    pub fn add_connection(
        &mut self,
        source: &str,
        destination: &str,
        label: &str,
        technology: &str,
    ) -> Result<usize, CoreError> {
        if !self.contains_component(source) {
            return Err(CoreError::UnknownEndpoint {
                endpoint: Endpoint::Source,
                name: source.to_string(),
            });
        }
        if !self.contains_component(destination) {
            return Err(CoreError::UnknownEndpoint {
                endpoint: Endpoint::Destination,
                name: destination.to_string(),
            });
        }
        self.connections
            .push(Connection::new(source, destination, label, technology));
        Ok(self.connections.len() - 1)
    }

    /// Applies `patch` to the connection at `index`.
    ///
    /// Positions shift after any delete; callers must re-read the sequence
    /// after a structural edit.
    pub fn update_connection(
        &mut self,
        index: usize,
        patch: &ConnectionPatch,
    ) -> Result<&Connection, CoreError> {
        let len = self.connections.len();
        let connection = self
            .connections
            .get_mut(index)
            .ok_or(CoreError::IndexOutOfRange { index, len })?;
        patch.apply(connection);
        Ok(connection)
    }

    /// Removes and returns the connection at `index`.
    pub fn delete_connection(&mut self, index: usize) -> Result<Connection, CoreError> {
        let len = self.connections.len();
        if index >= len {
            return Err(CoreError::IndexOutOfRange { index, len });
        }
        Ok(self.connections.remove(index))
    }

    // -----------------------------------------------------------------------
    // Deployment state
    // -----------------------------------------------------------------------

    /// Records a deployment state for `name`. See [`StateTracker::set_state`].
    pub fn set_component_state(
        &mut self,
        name: &str,
        state: DeploymentState,
        resource_id: Option<String>,
        error_message: Option<String>,
    ) -> &ComponentStateInfo {
        self.component_states
            .set_state(name, state, resource_id, error_message)
    }

    /// Returns the state for `name`, creating an `Undeployed` entry if there
    /// is none yet. See [`StateTracker::get_or_init`].
    pub fn component_state_or_init(&mut self, name: &str) -> &ComponentStateInfo {
        self.component_states.get_or_init(name)
    }

    /// Returns the state for `name` without creating one.
    pub fn peek_component_state(&self, name: &str) -> Option<&ComponentStateInfo> {
        self.component_states.peek(name)
    }
}
