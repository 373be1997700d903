//! crates/welcomebook_core/src/sections.rs
//!
//! The section schema registry and validation engine.
//!
//! Every section type has a fixed payload shape. Payloads arrive as free-form
//! JSON from the editor and are parsed into the `SectionPayload` tagged union
//! before anything is persisted; a parse failure is a field-attributed
//! `ValidationError` that is surfaced verbatim to the caller. An empty object
//! is not an error at the call sites that allow incremental editing - those
//! skip validation entirely for empty payloads.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::SectionType;

//=========================================================================================
// Validation Error Types
//=========================================================================================

/// A single offending field within a payload, e.g. `networkName` or
/// `contacts[2].phone`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// A structured validation failure naming every offending field.
#[derive(Debug, Clone, thiserror::Error, Serialize)]
#[error("invalid section data: {}", self.describe())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    fn describe(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// True if any error is attributed to the given field.
    pub fn names_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

//=========================================================================================
// The Section Payload Tagged Union
//=========================================================================================

/// A contact entry in an EMERGENCY section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

/// An appliance entry in an APPLIANCES section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplianceItem {
    pub name: String,
    pub instructions: String,
}

/// A recommendation entry in a PLACES section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceItem {
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One variant per section type. Field names serialize in the camelCase form
/// the editor and public view exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionPayload {
    #[serde(rename_all = "camelCase")]
    Wifi {
        network_name: String,
        password: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    Access {
        instructions: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Location {
        address: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        instructions: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        map_embed: Option<String>,
    },
    Host {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        phone: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    Emergency {
        contacts: Vec<EmergencyContact>,
    },
    Appliances {
        items: Vec<ApplianceItem>,
    },
    Places {
        places: Vec<PlaceItem>,
    },
    Custom {
        title: String,
        content: String,
    },
    Trash {
        instructions: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        schedule: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Maps360 {
        title: String,
        embed_url: String,
    },
    // htmlCode is served verbatim: the widget embed is a documented trust
    // boundary and only trusted hosts may set it. Sanitizing here could
    // break the intended embed.
    #[serde(rename_all = "camelCase")]
    Widget {
        title: String,
        html_code: String,
    },
}

impl SectionPayload {
    /// Parses and validates a raw payload against the schema for `ty`.
    ///
    /// The match is exhaustive over the type enumeration, so adding a new
    /// section type forces a schema definition here.
    pub fn from_value(ty: SectionType, data: &Value) -> Result<SectionPayload, ValidationError> {
        let map = as_object(data)?;
        let mut errors = Vec::new();

        let payload = match ty {
            SectionType::Wifi => SectionPayload::Wifi {
                network_name: required_string(map, "networkName", &mut errors),
                password: required_string(map, "password", &mut errors),
                notes: optional_string(map, "notes", &mut errors),
            },
            SectionType::Access => SectionPayload::Access {
                instructions: required_string(map, "instructions", &mut errors),
                title: optional_string(map, "title", &mut errors),
            },
            SectionType::Location => SectionPayload::Location {
                address: required_string(map, "address", &mut errors),
                instructions: optional_string(map, "instructions", &mut errors),
                map_embed: optional_string(map, "mapEmbed", &mut errors),
            },
            SectionType::Host => SectionPayload::Host {
                name: required_string(map, "name", &mut errors),
                phone: optional_string(map, "phone", &mut errors),
                email: optional_string(map, "email", &mut errors),
                notes: optional_string(map, "notes", &mut errors),
            },
            SectionType::Emergency => SectionPayload::Emergency {
                contacts: required_list(map, "contacts", &mut errors, |entry, path, errors| {
                    EmergencyContact {
                        name: required_string_at(entry, path, "name", errors),
                        phone: required_string_at(entry, path, "phone", errors),
                    }
                }),
            },
            SectionType::Appliances => SectionPayload::Appliances {
                items: required_list(map, "items", &mut errors, |entry, path, errors| {
                    ApplianceItem {
                        name: required_string_at(entry, path, "name", errors),
                        instructions: required_string_at(entry, path, "instructions", errors),
                    }
                }),
            },
            SectionType::Places => SectionPayload::Places {
                places: required_list(map, "places", &mut errors, |entry, path, errors| {
                    PlaceItem {
                        name: required_string_at(entry, path, "name", errors),
                        category: required_string_at(entry, path, "category", errors),
                        address: optional_string_at(entry, path, "address", errors),
                        notes: optional_string_at(entry, path, "notes", errors),
                    }
                }),
            },
            SectionType::Custom => SectionPayload::Custom {
                title: required_string(map, "title", &mut errors),
                content: required_string(map, "content", &mut errors),
            },
            SectionType::Trash => SectionPayload::Trash {
                instructions: required_string(map, "instructions", &mut errors),
                schedule: optional_string(map, "schedule", &mut errors),
            },
            SectionType::Maps360 => SectionPayload::Maps360 {
                title: required_string(map, "title", &mut errors),
                embed_url: required_string(map, "embedUrl", &mut errors),
            },
            SectionType::Widget => SectionPayload::Widget {
                title: required_string(map, "title", &mut errors),
                html_code: required_string(map, "htmlCode", &mut errors),
            },
        };

        if errors.is_empty() {
            Ok(payload)
        } else {
            Err(ValidationError { errors })
        }
    }

    /// Whether a successfully parsed payload actually carries content.
    /// List-shaped payloads with zero entries are valid but empty.
    pub fn has_content(&self) -> bool {
        match self {
            SectionPayload::Emergency { contacts } => !contacts.is_empty(),
            SectionPayload::Appliances { items } => !items.is_empty(),
            SectionPayload::Places { places } => !places.is_empty(),
            _ => true,
        }
    }
}

/// Validates a candidate payload for a section type. Callers that permit
/// incremental editing must skip this for empty payloads.
pub fn validate_section_data(ty: SectionType, data: &Value) -> Result<(), ValidationError> {
    SectionPayload::from_value(ty, data).map(|_| ())
}

/// True when the payload is a non-empty object that parses against the
/// type's schema and carries displayable content.
pub fn section_has_data(ty: SectionType, data: &Value) -> bool {
    match data.as_object() {
        Some(map) if !map.is_empty() => match SectionPayload::from_value(ty, data) {
            Ok(payload) => payload.has_content(),
            Err(_) => false,
        },
        _ => false,
    }
}

//=========================================================================================
// Field Extraction Helpers
//=========================================================================================

fn as_object(data: &Value) -> Result<&Map<String, Value>, ValidationError> {
    data.as_object().ok_or_else(|| ValidationError {
        errors: vec![FieldError {
            field: "data".to_string(),
            message: "payload must be a JSON object".to_string(),
        }],
    })
}

fn push_error(errors: &mut Vec<FieldError>, field: impl Into<String>, message: &str) {
    errors.push(FieldError {
        field: field.into(),
        message: message.to_string(),
    });
}

fn required_string(map: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) -> String {
    match map.get(field) {
        None | Some(Value::Null) => {
            push_error(errors, field, "is required");
            String::new()
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            push_error(errors, field, "must not be blank");
            String::new()
        }
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            push_error(errors, field, "must be a string");
            String::new()
        }
    }
}

fn optional_string(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match map.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            push_error(errors, field, "must be a string");
            None
        }
    }
}

fn required_string_at(
    entry: &Map<String, Value>,
    path: &str,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> String {
    let mut scoped = Vec::new();
    let value = required_string(entry, field, &mut scoped);
    for e in scoped {
        push_error(errors, format!("{path}.{field}"), &e.message);
    }
    value
}

fn optional_string_at(
    entry: &Map<String, Value>,
    path: &str,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let mut scoped = Vec::new();
    let value = optional_string(entry, field, &mut scoped);
    for e in scoped {
        push_error(errors, format!("{path}.{field}"), &e.message);
    }
    value
}

fn required_list<T>(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
    mut parse_entry: impl FnMut(&Map<String, Value>, &str, &mut Vec<FieldError>) -> T,
) -> Vec<T> {
    let items = match map.get(field) {
        None | Some(Value::Null) => {
            push_error(errors, field, "is required");
            return Vec::new();
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            push_error(errors, field, "must be a list");
            return Vec::new();
        }
    };

    let mut parsed = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let path = format!("{field}[{index}]");
        match item.as_object() {
            Some(entry) => parsed.push(parse_entry(entry, &path, errors)),
            None => push_error(errors, path, "must be an object"),
        }
    }
    parsed
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_payload(ty: SectionType) -> Value {
        match ty {
            SectionType::Wifi => json!({"networkName": "Casa_WiFi", "password": "hunter2"}),
            SectionType::Access => json!({"instructions": "Lockbox by the door, code 4812"}),
            SectionType::Location => json!({"address": "Calle Principal 123"}),
            SectionType::Host => json!({"name": "Maria Gonzalez"}),
            SectionType::Emergency => {
                json!({"contacts": [{"name": "Policia Nacional", "phone": "123"}]})
            }
            SectionType::Appliances => {
                json!({"items": [{"name": "Lavadora", "instructions": "Program 3, 40C"}]})
            }
            SectionType::Places => {
                json!({"places": [{"name": "El Mirador", "category": "Restaurant"}]})
            }
            SectionType::Custom => json!({"title": "House rules", "content": "No smoking"}),
            SectionType::Trash => json!({"instructions": "Bins are behind the gate"}),
            SectionType::Maps360 => {
                json!({"title": "Tour", "embedUrl": "https://example.com/embed"})
            }
            SectionType::Widget => {
                json!({"title": "Book again", "htmlCode": "<iframe src=\"x\"></iframe>"})
            }
        }
    }

    fn first_required_field(ty: SectionType) -> &'static str {
        match ty {
            SectionType::Wifi => "networkName",
            SectionType::Access | SectionType::Trash => "instructions",
            SectionType::Location => "address",
            SectionType::Host => "name",
            SectionType::Emergency => "contacts",
            SectionType::Appliances => "items",
            SectionType::Places => "places",
            SectionType::Custom | SectionType::Maps360 | SectionType::Widget => "title",
        }
    }

    #[test]
    fn complete_payloads_validate_for_every_type() {
        for ty in SectionType::ALL {
            let payload = complete_payload(ty);
            assert!(
                validate_section_data(ty, &payload).is_ok(),
                "{} should accept its complete payload",
                ty.as_str()
            );
        }
    }

    #[test]
    fn missing_required_field_is_named_for_every_type() {
        for ty in SectionType::ALL {
            let field = first_required_field(ty);
            let mut payload = complete_payload(ty);
            payload.as_object_mut().unwrap().remove(field);
            // Keep the payload non-empty so validation is not skippable.
            payload
                .as_object_mut()
                .unwrap()
                .insert("unrelated".to_string(), json!("x"));

            let err = validate_section_data(ty, &payload)
                .expect_err(&format!("{} should reject a missing {field}", ty.as_str()));
            assert!(
                err.names_field(field),
                "{} error should name '{}', got {:?}",
                ty.as_str(),
                field,
                err.errors
            );
        }
    }

    #[test]
    fn blank_required_string_is_rejected() {
        let payload = json!({"networkName": "   ", "password": "pw"});
        let err = validate_section_data(SectionType::Wifi, &payload).unwrap_err();
        assert!(err.names_field("networkName"));
    }

    #[test]
    fn wrong_type_is_rejected_with_field_name() {
        let payload = json!({"networkName": 42, "password": "pw"});
        let err = validate_section_data(SectionType::Wifi, &payload).unwrap_err();
        assert!(err.names_field("networkName"));
        assert_eq!(err.errors[0].message, "must be a string");
    }

    #[test]
    fn multiple_failures_are_all_reported() {
        let payload = json!({"unrelated": true});
        let err = validate_section_data(SectionType::Custom, &payload).unwrap_err();
        assert!(err.names_field("title"));
        assert!(err.names_field("content"));
    }

    #[test]
    fn list_entry_errors_carry_indexed_paths() {
        let payload = json!({"contacts": [
            {"name": "Fire brigade", "phone": "112"},
            {"name": "Ambulance"},
        ]});
        let err = validate_section_data(SectionType::Emergency, &payload).unwrap_err();
        assert!(err.names_field("contacts[1].phone"));
        assert!(!err.names_field("contacts[0].phone"));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = validate_section_data(SectionType::Wifi, &json!("just a string")).unwrap_err();
        assert!(err.names_field("data"));
    }

    #[test]
    fn empty_contact_list_validates_but_has_no_data() {
        let payload = json!({"contacts": []});
        assert!(validate_section_data(SectionType::Emergency, &payload).is_ok());
        assert!(!section_has_data(SectionType::Emergency, &payload));
    }

    #[test]
    fn empty_object_has_no_data() {
        assert!(!section_has_data(SectionType::Wifi, &json!({})));
        assert!(!section_has_data(SectionType::Wifi, &Value::Null));
    }

    #[test]
    fn populated_payload_has_data() {
        for ty in SectionType::ALL {
            assert!(
                section_has_data(ty, &complete_payload(ty)),
                "{} complete payload should count as populated",
                ty.as_str()
            );
        }
    }

    #[test]
    fn unknown_extra_keys_are_ignored() {
        let payload = json!({"networkName": "net", "password": "pw", "id": "editor-only"});
        assert!(validate_section_data(SectionType::Wifi, &payload).is_ok());
    }

    #[test]
    fn optional_blank_string_becomes_absent() {
        let payload = json!({"networkName": "net", "password": "pw", "notes": "  "});
        let parsed = SectionPayload::from_value(SectionType::Wifi, &payload).unwrap();
        match parsed {
            SectionPayload::Wifi { notes, .. } => assert!(notes.is_none()),
            other => panic!("unexpected payload {other:?}"),
        }
    }
}
