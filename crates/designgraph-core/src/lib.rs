//! Data model for infrastructure design graphs.
//!
//! A [`Design`] owns an ordered set of named [`Component`]s, the ordered
//! [`Connection`]s between them, and a per-component deployment record
//! ([`StateTracker`]). All graph edits go through `Design` methods so the
//! name-keyed references stay consistent: renames propagate into
//! connections and state, deletes cascade into connections.
//!
//! # Modules
//!
//! - [`id`]: DesignId newtype
//! - [`component`]: Component, ComponentKind, DomainType, ComponentPatch
//! - [`connection`]: Connection, ConnectionPatch
//! - [`state`]: DeploymentState, ComponentStateInfo, StateTracker
//! - [`design`]: the Design aggregate
//! - [`codec`]: canonical JSON encode/decode
//! - [`graph`]: ResolvedGraph, the name-resolved petgraph view
//! - [`error`]: CoreError
//! - [`timestamp`]: lenient timestamp decoding

pub mod codec;
pub mod component;
pub mod connection;
pub mod design;
pub mod error;
pub mod graph;
pub mod id;
pub mod state;
pub mod timestamp;

// Re-export commonly used types
pub use codec::CodecError;
pub use component::{Component, ComponentKind, ComponentPatch, DomainType};
pub use connection::{Connection, ConnectionPatch, Endpoint};
pub use design::{ComponentRemoval, Design};
pub use error::CoreError;
pub use graph::ResolvedGraph;
pub use id::DesignId;
pub use state::{ComponentStateInfo, DeploymentState, StateTracker};
