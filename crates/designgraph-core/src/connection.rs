//! Connection value types: the labeled, directed edges of a design graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A labeled edge between two components, referenced by name.
///
/// Self-loops and duplicate connections are both allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub technology: String,
}

impl Connection {
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        label: impl Into<String>,
        technology: impl Into<String>,
    ) -> Self {
        Connection {
            source: source.into(),
            destination: destination.into(),
            label: label.into(),
            technology: technology.into(),
        }
    }

    /// Returns true if either endpoint is `name`.
    pub fn touches(&self, name: &str) -> bool {
        self.source == name || self.destination == name
    }

    /// Rewrites every endpoint equal to `old` to `new`.
    pub(crate) fn rename_endpoint(&mut self, old: &str, new: &str) {
        if self.source == old {
            self.source = new.to_string();
        }
        if self.destination == old {
            self.destination = new.to_string();
        }
    }
}

/// Which end of a connection a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Source,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Source => f.write_str("source"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// A partial update to a [`Connection`]. Endpoints are fixed once created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
}

impl ConnectionPatch {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_technology(mut self, technology: impl Into<String>) -> Self {
        self.technology = Some(technology.into());
        self
    }

    pub(crate) fn apply(&self, connection: &mut Connection) {
        if let Some(label) = &self.label {
            connection.label = label.clone();
        }
        if let Some(technology) = &self.technology {
            connection.technology = technology.clone();
        }
    }
}
