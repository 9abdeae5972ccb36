//! Coordinating layer over the design crates.
//!
//! [`DesignService`] runs every edit through load, edit, validate, then
//! persist-or-reject. [`DesignError`] carries a stable code per failure
//! kind. [`StoreConfig`] picks and opens a storage backend.

pub mod config;
pub mod error;
pub mod service;

pub use config::{BackendKind, StoreConfig};
pub use error::{DesignError, ErrorDetail};
pub use service::DesignService;
