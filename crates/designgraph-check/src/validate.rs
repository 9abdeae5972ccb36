//! Whole-document validation.
//!
//! The validator never assumes the aggregate's own invariants hold: every
//! field is looked up defensively on the raw JSON tree, and checking carries
//! on past each defect so callers receive the complete list.

use std::collections::HashMap;

use serde_json::{Map, Value};

use designgraph_core::codec;
use designgraph_core::{ComponentKind, Design, DomainType};

use crate::diagnostics::ValidationError;

/// Top-level fields every design document must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["design_id", "name", "components", "connections"];

/// Checks only that the document is an object carrying [`REQUIRED_FIELDS`].
pub fn required_field_errors(document: &Value) -> Vec<ValidationError> {
    match document.as_object() {
        Some(root) => REQUIRED_FIELDS
            .iter()
            .filter(|field| !root.contains_key(**field))
            .map(|field| ValidationError::MissingField { field: *field })
            .collect(),
        None => vec![ValidationError::NotAnObject],
    }
}

/// Validates a raw design document and returns every defect found.
pub fn validate(document: &Value) -> Vec<ValidationError> {
    let mut errors = required_field_errors(document);
    let Some(root) = document.as_object() else {
        return errors;
    };

    let declared = match root.get("components") {
        Some(Value::Array(components)) => check_components(components, &mut errors),
        Some(_) => {
            errors.push(ValidationError::NotAList {
                field: "components",
            });
            HashMap::new()
        }
        None => HashMap::new(),
    };

    match root.get("connections") {
        Some(Value::Array(connections)) => check_connections(connections, &declared, &mut errors),
        Some(_) => errors.push(ValidationError::NotAList {
            field: "connections",
        }),
        None => {}
    }

    errors
}

/// Validates an in-memory design through its canonical encoding.
pub fn validate_design(design: &Design) -> Vec<ValidationError> {
    match codec::encode(design) {
        Ok(document) => validate(&document),
        Err(err) => vec![ValidationError::Undecodable {
            reason: err.to_string(),
        }],
    }
}

/// Checks each component entry and returns the declared names, mapped to the
/// index of their first declaration.
fn check_components(
    components: &[Value],
    errors: &mut Vec<ValidationError>,
) -> HashMap<String, usize> {
    let mut declared: HashMap<String, usize> = HashMap::new();

    for (index, entry) in components.iter().enumerate() {
        let Some(component) = entry.as_object() else {
            errors.push(ValidationError::ComponentNotAnObject { index });
            continue;
        };

        for field in ["name", "type", "domain_type"] {
            if !component.contains_key(field) {
                errors.push(ValidationError::ComponentMissingField { index, field });
            }
        }

        match component.get("name") {
            Some(Value::String(name)) if !name.is_empty() => match declared.get(name) {
                Some(&first) => errors.push(ValidationError::DuplicateComponentName {
                    index,
                    first,
                    name: name.clone(),
                }),
                None => {
                    declared.insert(name.clone(), index);
                }
            },
            Some(other) => errors.push(ValidationError::InvalidComponentName {
                index,
                value: render(other),
            }),
            None => {}
        }

        check_vocabulary(component, index, errors);
    }

    declared
}

/// The exhaustiveness check on `type` and `domain_type`.
fn check_vocabulary(component: &Map<String, Value>, index: usize, errors: &mut Vec<ValidationError>) {
    if let Some(value) = component.get("type") {
        let recognized = value
            .as_str()
            .is_some_and(|s| ComponentKind::from(s).is_recognized());
        if !recognized {
            errors.push(ValidationError::InvalidKind {
                index,
                value: render(value),
            });
        }
    }

    if let Some(value) = component.get("domain_type") {
        let recognized = value
            .as_str()
            .is_some_and(|s| DomainType::from(s).is_recognized());
        if !recognized {
            errors.push(ValidationError::InvalidDomainType {
                index,
                value: render(value),
            });
        }
    }
}

fn check_connections(
    connections: &[Value],
    declared: &HashMap<String, usize>,
    errors: &mut Vec<ValidationError>,
) {
    for (index, entry) in connections.iter().enumerate() {
        let Some(connection) = entry.as_object() else {
            errors.push(ValidationError::ConnectionNotAnObject { index });
            continue;
        };

        for field in ["source", "destination"] {
            match connection.get(field) {
                None => errors.push(ValidationError::ConnectionMissingField { index, field }),
                Some(Value::String(name)) if declared.contains_key(name) => {}
                Some(other) => errors.push(ValidationError::UnknownEndpoint {
                    index,
                    field,
                    name: render(other),
                }),
            }
        }
    }
}

/// Formats a JSON value for an error message: strings bare, anything else as
/// JSON text.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use designgraph_core::{Component, ComponentPatch};

    fn valid_document() -> Value {
        json!({
            "design_id": "0b6f3e52-6c1a-4d0e-b9a4-2f1d7c8e9a10",
            "name": "shop",
            "components": [
                {"name": "api", "type": "Gateway", "domain_type": "Public", "technology": "Kong"},
                {"name": "web", "type": "Container", "domain_type": "Web", "technology": "Docker"}
            ],
            "connections": [
                {"source": "web", "destination": "api", "label": "calls", "technology": "HTTPS"}
            ],
            "component_states": {},
            "created_at": "2024-03-01T12:00:00Z",
            "updated_at": "2024-03-01T12:00:00Z"
        })
    }

    fn messages(errors: &[ValidationError]) -> Vec<String> {
        ValidationError::messages(errors)
    }

    #[test]
    fn valid_document_has_no_errors() {
        assert!(validate(&valid_document()).is_empty());
    }

    #[test]
    fn non_object_root() {
        assert_eq!(validate(&json!([1, 2])), vec![ValidationError::NotAnObject]);
        assert_eq!(required_field_errors(&json!("x")), vec![ValidationError::NotAnObject]);
    }

    #[test]
    fn reports_every_missing_top_level_field() {
        let errors = validate(&json!({}));
        assert_eq!(
            messages(&errors),
            vec![
                "Missing required field: design_id",
                "Missing required field: name",
                "Missing required field: components",
                "Missing required field: connections",
            ]
        );
    }

    #[test]
    fn sequences_must_be_lists() {
        let mut doc = valid_document();
        doc["components"] = json!({"api": {}});
        doc["connections"] = json!("none");
        let errors = validate(&doc);
        assert!(errors.contains(&ValidationError::NotAList { field: "components" }));
        assert!(errors.contains(&ValidationError::NotAList { field: "connections" }));
    }

    #[test]
    fn connections_cannot_resolve_against_a_non_list() {
        let mut doc = valid_document();
        doc["components"] = json!(null);
        let errors = validate(&doc);
        assert_eq!(
            messages(&errors),
            vec![
                "'components' must be a list",
                "Connection 0 references non-existent source: web",
                "Connection 0 references non-existent destination: api",
            ]
        );
    }

    #[test]
    fn two_independent_defects_are_both_reported() {
        let mut doc = valid_document();
        doc["components"][0]["domain_type"] = json!("Cloud");
        doc["connections"] = json!([
            {"source": "web", "destination": "api"},
            {"source": "ghost", "destination": "api"}
        ]);

        let errors = validate(&doc);

        assert_eq!(
            messages(&errors),
            vec![
                "Component 0 has invalid domain_type: Cloud",
                "Connection 1 references non-existent source: ghost",
            ]
        );
    }

    #[test]
    fn malformed_component_entries() {
        let mut doc = valid_document();
        doc["components"] = json!([
            "api",
            {"type": "Lambda"},
            {"name": "", "type": 7, "domain_type": "Data"}
        ]);
        doc["connections"] = json!([]);

        let errors = validate(&doc);

        assert_eq!(
            messages(&errors),
            vec![
                "Component 0 must be an object",
                "Component 1 missing 'name' field",
                "Component 1 missing 'domain_type' field",
                "Component 2 has invalid name: ",
                "Component 2 has invalid type: 7",
            ]
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut doc = valid_document();
        doc["components"][1]["type"] = json!("Queue");
        assert_eq!(
            validate(&doc),
            vec![ValidationError::InvalidKind {
                index: 1,
                value: "Queue".into()
            }]
        );
    }

    #[test]
    fn duplicate_names_are_reported_against_first_declaration() {
        let mut doc = valid_document();
        doc["components"][1]["name"] = json!("api");
        doc["connections"] = json!([]);
        assert_eq!(
            messages(&validate(&doc)),
            vec!["Component 1 duplicates name of component 0: api"]
        );
    }

    #[test]
    fn malformed_connection_entries() {
        let mut doc = valid_document();
        doc["connections"] = json!([
            42,
            {"destination": "api"},
            {"source": "api", "destination": null}
        ]);
        assert_eq!(
            messages(&validate(&doc)),
            vec![
                "Connection 0 must be an object",
                "Connection 1 missing 'source' field",
                "Connection 2 references non-existent destination: null",
            ]
        );
    }

    #[test]
    fn self_loops_and_duplicate_connections_are_valid() {
        let mut doc = valid_document();
        doc["connections"] = json!([
            {"source": "api", "destination": "api"},
            {"source": "web", "destination": "api"},
            {"source": "web", "destination": "api"}
        ]);
        assert!(validate(&doc).is_empty());
    }

    #[test]
    fn validate_design_flags_unrecognized_domain_from_the_typed_model() {
        let mut design = Design::new("typed");
        design
            .add_component(Component::new(
                "edge",
                ComponentKind::Gateway,
                DomainType::Unrecognized("Edge".into()),
                "",
            ))
            .unwrap();
        assert_eq!(
            validate_design(&design),
            vec![ValidationError::InvalidDomainType {
                index: 0,
                value: "Edge".into()
            }]
        );

        design
            .update_component("edge", &ComponentPatch::default().with_domain_type(DomainType::Public))
            .unwrap();
        assert!(validate_design(&design).is_empty());
    }
}
