//! Core error types for designgraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of graph edits on a [`Design`](crate::Design).

use thiserror::Error;

use crate::connection::Endpoint;

/// Errors produced by aggregate edits and graph resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No component with this name exists in the design.
    #[error("component not found: '{name}'")]
    ComponentNotFound { name: String },

    /// A different component already uses this name.
    #[error("component '{name}' already exists")]
    DuplicateName { name: String },

    /// A connection endpoint does not name an existing component.
    #[error("{endpoint} component '{name}' not found")]
    UnknownEndpoint { endpoint: Endpoint, name: String },

    /// A connection position outside the current sequence.
    #[error("connection {index} not found (design has {len} connections)")]
    IndexOutOfRange { index: usize, len: usize },
}
