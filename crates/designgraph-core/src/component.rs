//! Component value types: the nodes of a design graph.
//!
//! [`ComponentKind`] and [`DomainType`] are closed enumerations with one
//! extra `Unrecognized` variant holding the raw text. Reading a document
//! written by a newer tool with an extended vocabulary therefore succeeds;
//! the validator is where unrecognized values are rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The infrastructure role of a component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    Gateway,
    Container,
    Lambda,
    Cache,
    Rdms,
    Archive,
    /// A kind name this build does not know about.
    Unrecognized(String),
}

impl ComponentKind {
    /// Every recognized kind name, in declaration order.
    pub const KNOWN: [&'static str; 6] =
        ["Gateway", "Container", "Lambda", "Cache", "Rdms", "Archive"];

    /// Returns the serialized name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            ComponentKind::Gateway => "Gateway",
            ComponentKind::Container => "Container",
            ComponentKind::Lambda => "Lambda",
            ComponentKind::Cache => "Cache",
            ComponentKind::Rdms => "Rdms",
            ComponentKind::Archive => "Archive",
            ComponentKind::Unrecognized(raw) => raw,
        }
    }

    /// Returns `false` for [`ComponentKind::Unrecognized`].
    pub fn is_recognized(&self) -> bool {
        !matches!(self, ComponentKind::Unrecognized(_))
    }
}

impl From<&str> for ComponentKind {
    fn from(s: &str) -> Self {
        match s {
            "Gateway" => ComponentKind::Gateway,
            "Container" => ComponentKind::Container,
            "Lambda" => ComponentKind::Lambda,
            "Cache" => ComponentKind::Cache,
            "Rdms" => ComponentKind::Rdms,
            "Archive" => ComponentKind::Archive,
            other => ComponentKind::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for ComponentKind {
    fn from(s: String) -> Self {
        ComponentKind::from(s.as_str())
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The architectural tier a component sits in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DomainType {
    Public,
    Web,
    Application,
    Data,
    /// A tier name this build does not know about.
    Unrecognized(String),
}

impl DomainType {
    /// Every recognized tier name, in declaration order.
    pub const KNOWN: [&'static str; 4] = ["Public", "Web", "Application", "Data"];

    /// Returns the serialized name of this tier.
    pub fn as_str(&self) -> &str {
        match self {
            DomainType::Public => "Public",
            DomainType::Web => "Web",
            DomainType::Application => "Application",
            DomainType::Data => "Data",
            DomainType::Unrecognized(raw) => raw,
        }
    }

    /// Returns `false` for [`DomainType::Unrecognized`].
    pub fn is_recognized(&self) -> bool {
        !matches!(self, DomainType::Unrecognized(_))
    }
}

impl From<&str> for DomainType {
    fn from(s: &str) -> Self {
        match s {
            "Public" => DomainType::Public,
            "Web" => DomainType::Web,
            "Application" => DomainType::Application,
            "Data" => DomainType::Data,
            other => DomainType::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for DomainType {
    fn from(s: String) -> Self {
        DomainType::from(s.as_str())
    }
}

impl From<DomainType> for String {
    fn from(domain: DomainType) -> Self {
        match domain {
            DomainType::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named node in a design graph.
///
/// The name is the component's identity within its design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    /// Serialized under `type`, matching the interchange documents.
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub domain_type: DomainType,
    #[serde(default)]
    pub technology: String,
}

impl Component {
    pub fn new(
        name: impl Into<String>,
        kind: ComponentKind,
        domain_type: DomainType,
        technology: impl Into<String>,
    ) -> Self {
        Component {
            name: name.into(),
            kind,
            domain_type,
            technology: technology.into(),
        }
    }
}

/// A partial update to a [`Component`]. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ComponentKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_type: Option<DomainType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
}

impl ComponentPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        ComponentPatch {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: ComponentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_domain_type(mut self, domain_type: DomainType) -> Self {
        self.domain_type = Some(domain_type);
        self
    }

    pub fn with_technology(mut self, technology: impl Into<String>) -> Self {
        self.technology = Some(technology.into());
        self
    }

    /// Returns the new name if this patch actually renames `current`.
    pub(crate) fn renames(&self, current: &str) -> Option<&str> {
        self.name.as_deref().filter(|new| *new != current)
    }

    /// Applies every non-name field to `component`.
    pub(crate) fn apply_attributes(&self, component: &mut Component) {
        if let Some(kind) = &self.kind {
            component.kind = kind.clone();
        }
        if let Some(domain_type) = &self.domain_type {
            component.domain_type = domain_type.clone();
        }
        if let Some(technology) = &self.technology {
            component.technology = technology.clone();
        }
    }
}
