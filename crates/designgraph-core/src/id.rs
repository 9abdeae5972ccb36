//! Design identity.
//!
//! A [`DesignId`] is allocated once when a design is created and never
//! changes afterwards. It doubles as the storage key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, immutable identifier of a stored design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DesignId(pub Uuid);

impl DesignId {
    /// Allocates a fresh random identifier.
    pub fn new() -> Self {
        DesignId(Uuid::new_v4())
    }
}

impl Default for DesignId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DesignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DesignId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(DesignId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        assert_ne!(DesignId::new(), DesignId::new());
    }

    #[test]
    fn display_parse_roundtrip() {
        let id = DesignId::new();
        let parsed: DesignId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("not-a-design".parse::<DesignId>().is_err());
    }

    #[test]
    fn serializes_as_bare_string() {
        let id: DesignId = "6f1c2a4e-8d4b-4f7e-9a63-0c5b1d2e3f40".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"6f1c2a4e-8d4b-4f7e-9a63-0c5b1d2e3f40\"");
    }
}
