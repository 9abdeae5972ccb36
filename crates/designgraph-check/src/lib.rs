//! Structural and referential validation of design documents.
//!
//! Provides two entry points:
//! - [`validate`]: checks a raw JSON document tree and reports ALL defects at
//!   once. Works on hand-edited or partially broken documents.
//! - [`validate_design`]: checks an in-memory [`Design`] by validating its
//!   canonical encoding.
//!
//! [`required_field_errors`] is the shape check shared with the storage
//! layer's load path.
//!
//! All functions are pure; an empty result means the document is valid.
//!
//! [`Design`]: designgraph_core::Design

pub mod diagnostics;
pub mod validate;

pub use diagnostics::ValidationError;
pub use validate::{required_field_errors, validate, validate_design, REQUIRED_FIELDS};
