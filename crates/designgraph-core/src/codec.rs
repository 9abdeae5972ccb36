//! Canonical JSON encoding of a [`Design`].
//!
//! The encoded document carries exactly the aggregate's fields, in the order
//! `design_id, name, components, connections, component_states, created_at,
//! updated_at`. Optional state fields that are absent are omitted rather than
//! written as `null`, and decode them back to `None`.
//!
//! `decode(encode(d)) == d` for every design.

use serde_json::Value;
use thiserror::Error;

use crate::design::Design;

/// Errors produced while encoding or decoding a design document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The text is not well-formed JSON.
    #[error("invalid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// The JSON is well-formed but does not describe a design (wrong types,
    /// missing fields, a state outside the known set, ...).
    #[error("invalid design document: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Encodes a design into its canonical document tree.
pub fn encode(design: &Design) -> Result<Value, CodecError> {
    serde_json::to_value(design).map_err(CodecError::Shape)
}

/// Decodes a document tree into a design.
pub fn decode(document: Value) -> Result<Design, CodecError> {
    serde_json::from_value(document).map_err(CodecError::Shape)
}

/// Encodes a design as pretty-printed JSON text.
pub fn to_string(design: &Design) -> Result<String, CodecError> {
    serde_json::to_string_pretty(design).map_err(CodecError::Shape)
}

/// Parses JSON text into a document tree without interpreting it.
pub fn parse_document(text: &str) -> Result<Value, CodecError> {
    serde_json::from_str(text).map_err(CodecError::Syntax)
}

/// Parses and decodes JSON text into a design.
pub fn from_str(text: &str) -> Result<Design, CodecError> {
    decode(parse_document(text)?)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::component::{Component, ComponentKind, DomainType};
    use crate::connection::Connection;
    use crate::id::DesignId;
    use crate::state::{DeploymentState, StateTracker};

    fn fixed_design() -> Design {
        let mut states = StateTracker::new();
        states.set_state("api", DeploymentState::Deployed, Some("gw-1".into()), None);
        let mut design = Design::from_parts(
            "0b6f3e52-6c1a-4d0e-b9a4-2f1d7c8e9a10".parse::<DesignId>().unwrap(),
            "shop".into(),
            vec![
                Component::new("api", ComponentKind::Gateway, DomainType::Public, "Kong"),
                Component::new("db", ComponentKind::Rdms, DomainType::Data, "PostgreSQL"),
            ],
            vec![Connection::new("api", "db", "queries", "SQL")],
            states,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 2, 8, 30, 0).unwrap(),
        );
        design.component_state_or_init("db");
        design
    }

    #[test]
    fn encode_uses_canonical_field_order() {
        let doc = encode(&fixed_design()).unwrap();
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "design_id",
                "name",
                "components",
                "connections",
                "component_states",
                "created_at",
                "updated_at"
            ]
        );
        let component_keys: Vec<&str> = doc["components"][0]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(component_keys, vec!["name", "type", "domain_type", "technology"]);
    }

    #[test]
    fn encode_omits_absent_optionals() {
        let doc = encode(&fixed_design()).unwrap();
        let api = &doc["component_states"]["api"];
        assert_eq!(api["state"], "deployed");
        assert_eq!(api["resource_id"], "gw-1");
        assert!(api.get("error_message").is_none());

        let db = &doc["component_states"]["db"];
        assert_eq!(db["state"], "undeployed");
        assert!(db.get("resource_id").is_none());
    }

    #[test]
    fn roundtrip_is_identity() {
        let design = fixed_design();
        let text = to_string(&design).unwrap();
        assert_eq!(from_str(&text).unwrap(), design);
        assert_eq!(decode(encode(&design).unwrap()).unwrap(), design);
    }

    #[test]
    fn decode_rejects_unknown_state() {
        let mut doc = encode(&fixed_design()).unwrap();
        doc["component_states"]["api"]["state"] = json!("paused");
        assert!(matches!(decode(doc), Err(CodecError::Shape(_))));
    }

    #[test]
    fn decode_treats_null_optionals_as_absent() {
        let mut doc = encode(&fixed_design()).unwrap();
        doc["component_states"]["db"]["resource_id"] = Value::Null;
        doc["component_states"]["db"]["error_message"] = Value::Null;
        let design = decode(doc).unwrap();
        let db = design.peek_component_state("db").unwrap();
        assert_eq!(db.resource_id, None);
        assert_eq!(db.error_message, None);
    }

    #[test]
    fn decode_accepts_unrecognized_kind_and_domain() {
        let mut doc = encode(&fixed_design()).unwrap();
        doc["components"][0]["type"] = json!("Queue");
        doc["components"][0]["domain_type"] = json!("Edge");
        let design = decode(doc).unwrap();
        let api = design.component("api").unwrap();
        assert_eq!(api.kind, ComponentKind::Unrecognized("Queue".into()));
        assert_eq!(api.domain_type, DomainType::Unrecognized("Edge".into()));
    }

    #[test]
    fn decode_tolerates_missing_component_states() {
        let doc = json!({
            "design_id": "0b6f3e52-6c1a-4d0e-b9a4-2f1d7c8e9a10",
            "name": "legacy",
            "components": [],
            "connections": [],
            "created_at": "2024-03-01T12:00:00Z",
            "updated_at": "2024-03-01T12:00:00Z"
        });
        let design = decode(doc).unwrap();
        assert!(design.component_states().is_empty());
    }

    #[test]
    fn decode_reads_naive_timestamps_as_utc() {
        let doc = json!({
            "design_id": "0b6f3e52-6c1a-4d0e-b9a4-2f1d7c8e9a10",
            "name": "legacy",
            "components": [],
            "connections": [],
            "component_states": {
                "api": {"state": "deployed", "last_updated": "2024-03-01T12:30:00"}
            },
            "created_at": "2024-03-01T12:00:00.123456",
            "updated_at": "2024-03-01T12:00:00.123456"
        });
        let design = decode(doc).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
            + chrono::Duration::microseconds(123_456);
        assert_eq!(design.created_at(), expected);
        assert_eq!(design.updated_at(), expected);
        assert_eq!(
            design.peek_component_state("api").unwrap().last_updated,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
        );

        let encoded = encode(&design).unwrap();
        assert_eq!(encoded["created_at"], json!("2024-03-01T12:00:00.123456Z"));
        assert_eq!(decode(encoded).unwrap(), design);
    }

    #[test]
    fn decode_rejects_unparseable_timestamp() {
        let mut doc = encode(&fixed_design()).unwrap();
        doc["created_at"] = json!("last tuesday");
        assert!(matches!(decode(doc), Err(CodecError::Shape(_))));
    }

    #[test]
    fn parse_document_reports_syntax_errors() {
        assert!(matches!(parse_document("{ nope"), Err(CodecError::Syntax(_))));
    }
}
