//! Service-level error type with stable machine-readable codes.
//!
//! [`DesignError`] is the unified error type for every [`DesignService`]
//! operation. A transport layer maps [`DesignError::code`] to its own status
//! scheme; [`DesignError::detail`] gives it a serializable body.
//!
//! [`DesignService`]: crate::DesignService

use serde::Serialize;

use designgraph_check::ValidationError;
use designgraph_core::CoreError;
use designgraph_storage::StorageError;

/// Structured error body for callers that report errors as data.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_FAILED").
    pub code: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Every validation message, for `VALIDATION_FAILED`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Errors produced by design service operations.
#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    /// A design, component, or state entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A component name is already taken.
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// A connection endpoint names no existing component.
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// A connection was addressed by a stale or invalid position.
    #[error("connection {index} out of range (design has {len} connections)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The edited design failed validation; nothing was persisted.
    #[error("validation failed with {} error(s)", .0.len())]
    ValidationFailed(Vec<ValidationError>),

    /// A stored record could not be read back as a design.
    #[error("corrupt design: {0}")]
    Corrupt(String),

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl DesignError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DesignError::NotFound(_) => "NOT_FOUND",
            DesignError::DuplicateName(_) => "DUPLICATE_NAME",
            DesignError::UnknownEndpoint(_) => "UNKNOWN_ENDPOINT",
            DesignError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            DesignError::ValidationFailed(_) => "VALIDATION_FAILED",
            DesignError::Corrupt(_) => "CORRUPT",
            DesignError::Storage(_) => "STORAGE",
        }
    }

    /// Validation messages carried by `ValidationFailed`, empty otherwise.
    pub fn validation_messages(&self) -> Vec<String> {
        match self {
            DesignError::ValidationFailed(errors) => ValidationError::messages(errors),
            _ => Vec::new(),
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: self.code(),
            message: self.to_string(),
            errors: self.validation_messages(),
        }
    }
}

impl From<CoreError> for DesignError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::ComponentNotFound { .. } => DesignError::NotFound(err.to_string()),
            CoreError::DuplicateName { .. } => DesignError::DuplicateName(err.to_string()),
            CoreError::UnknownEndpoint { .. } => DesignError::UnknownEndpoint(err.to_string()),
            CoreError::IndexOutOfRange { index, len } => DesignError::IndexOutOfRange {
                index: *index,
                len: *len,
            },
        }
    }
}

impl From<StorageError> for DesignError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::NotFound(_) => DesignError::NotFound(err.to_string()),
            StorageError::Corrupt { .. } => DesignError::Corrupt(err.to_string()),
            _ => DesignError::Storage(err.to_string()),
        }
    }
}
