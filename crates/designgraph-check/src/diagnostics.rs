//! Validation diagnostics.
//!
//! Each [`ValidationError`] names one defect. Its `Display` output is the
//! human-readable message shown to users and identifies the offending
//! component or connection by its index in the document.

use serde::Serialize;

/// A single defect found by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// The document root is not a JSON object.
    #[error("design document must be an object")]
    NotAnObject,

    /// A required top-level field is absent.
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// `components` or `connections` is present but not a list.
    #[error("'{field}' must be a list")]
    NotAList { field: &'static str },

    /// A component entry is not an object.
    #[error("Component {index} must be an object")]
    ComponentNotAnObject { index: usize },

    /// A component entry lacks `name`, `type`, or `domain_type`.
    #[error("Component {index} missing '{field}' field")]
    ComponentMissingField { index: usize, field: &'static str },

    /// A component name is empty or not a string.
    #[error("Component {index} has invalid name: {value}")]
    InvalidComponentName { index: usize, value: String },

    /// A component reuses a name declared by an earlier component.
    #[error("Component {index} duplicates name of component {first}: {name}")]
    DuplicateComponentName {
        index: usize,
        first: usize,
        name: String,
    },

    /// A component's `type` is not one of the known kinds.
    #[error("Component {index} has invalid type: {value}")]
    InvalidKind { index: usize, value: String },

    /// A component's `domain_type` is not one of the four tiers.
    #[error("Component {index} has invalid domain_type: {value}")]
    InvalidDomainType { index: usize, value: String },

    /// A connection entry is not an object.
    #[error("Connection {index} must be an object")]
    ConnectionNotAnObject { index: usize },

    /// A connection entry lacks `source` or `destination`.
    #[error("Connection {index} missing '{field}' field")]
    ConnectionMissingField { index: usize, field: &'static str },

    /// A connection endpoint names no declared component.
    #[error("Connection {index} references non-existent {field}: {name}")]
    UnknownEndpoint {
        index: usize,
        field: &'static str,
        name: String,
    },

    /// The document passed every structural check but still could not be
    /// decoded into a design (bad timestamp, unknown deployment state, ...).
    #[error("design document could not be decoded: {reason}")]
    Undecodable { reason: String },
}

impl ValidationError {
    /// Renders a list of errors as their messages.
    pub fn messages(errors: &[ValidationError]) -> Vec<String> {
        errors.iter().map(ToString::to_string).collect()
    }
}
