//! Validation of generated documents and of payloads against them.

use serde_json::{json, Value};

use crate::error::{SchemaError, ValidateError};
use crate::resolver::definition_pointer;
use crate::types::JsonSchemaDocument;

/// Check a generated document against its `$schema` meta-schema.
///
/// Building a validator checks the schema against its meta-schema first, so
/// a document that compiles is a valid schema.
///
/// # Errors
///
/// Returns `ValidateError::InvalidSchema` describing the first violation.
pub fn check_document(document: &JsonSchemaDocument) -> Result<(), ValidateError> {
    let value = document.to_value();
    jsonschema::validator_for(&value)
        .map(|_| ())
        .map_err(|e| ValidateError::InvalidSchema {
            message: format!("{}: {}", e.instance_path, e),
        })
}

/// Validate a payload against one definition of a generated document.
///
/// The definition is validated in the context of the whole document, so
/// preserved `#/definitions/...` references resolve.
///
/// # Errors
///
/// Returns `ValidateError::UnknownDefinition` if `name` isn't defined,
/// `ValidateError::InvalidSchema` if the document can't be compiled, or
/// `ValidateError::Invalid` if the payload doesn't match.
pub fn validate_definition(
    document: &JsonSchemaDocument,
    name: &str,
    payload: &Value,
) -> Result<(), ValidateError> {
    if !document.definitions.contains_key(name) {
        return Err(ValidateError::UnknownDefinition {
            name: name.to_string(),
        });
    }

    // `$id` is left out so the local ref resolves against the document itself
    let schema = json!({
        "$schema": document.schema,
        "definitions": document.definitions,
        "$ref": definition_pointer(name),
    });

    validate_against_schema(&schema, payload)
}

/// Validate a payload against an arbitrary compiled schema.
pub fn validate_against_schema(schema: &Value, payload: &Value) -> Result<(), ValidateError> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| ValidateError::InvalidSchema {
            message: e.to_string(),
        })?;

    let errors: Vec<SchemaError> = validator
        .iter_errors(payload)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform;
    use crate::types::{ConvertOptions, Definitions, DEFAULT_SCHEMA};

    fn petstore(options: &ConvertOptions) -> JsonSchemaDocument {
        let definitions: Definitions = json!({
            "Owner": {
                "type": "object",
                "required": ["name"],
                "properties": { "name": { "type": "string" } }
            },
            "Pet": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": { "type": "string" },
                    "tag": { "type": "string", "x-nullable": true },
                    "owner": { "$ref": "#/definitions/Owner" }
                }
            }
        })
        .as_object()
        .unwrap()
        .clone();
        transform(&definitions, options).unwrap()
    }

    fn options() -> ConvertOptions {
        ConvertOptions::new(DEFAULT_SCHEMA, "https://example.com/petstore.json")
    }

    #[test]
    fn generated_document_passes_meta_schema() {
        assert!(check_document(&petstore(&options())).is_ok());
        assert!(check_document(&petstore(&options().resolve_refs(true))).is_ok());
    }

    #[test]
    fn every_accepted_schema_spelling_compiles() {
        for schema in [
            "http://json-schema.org/draft-04/schema#",
            "https://json-schema.org/draft-04/schema#",
            "http://json-schema.org/draft-06/schema",
            "http://json-schema.org/draft-07/schema#",
            "https://json-schema.org/draft-07/schema",
            "http://json-schema.org/draft/2019-09/schema",
            "https://json-schema.org/draft/2020-12/schema#",
        ] {
            let options = ConvertOptions::new(schema, "https://example.com/petstore.json");
            let doc = petstore(&options);
            assert!(check_document(&doc).is_ok(), "{schema}");

            let payload = json!({ "name": "Rex" });
            assert!(validate_definition(&doc, "Pet", &payload).is_ok(), "{schema}");
        }
    }

    #[test]
    fn nullable_reference_accepts_null() {
        let definitions: Definitions = json!({
            "Owner": { "type": "object" },
            "Pet": {
                "type": "object",
                "properties": {
                    "owner": { "$ref": "#/definitions/Owner", "x-nullable": true }
                }
            }
        })
        .as_object()
        .unwrap()
        .clone();

        for resolve in [false, true] {
            let doc = transform(&definitions, &options().resolve_refs(resolve)).unwrap();
            let payload = json!({ "owner": null });
            assert!(validate_definition(&doc, "Pet", &payload).is_ok());
        }
    }

    #[test]
    fn broken_document_fails_meta_schema() {
        let mut doc = petstore(&options());
        doc.definitions.insert("Bad".into(), json!({ "type": 12 }));
        assert!(matches!(
            check_document(&doc),
            Err(ValidateError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn valid_payload_with_preserved_ref() {
        let doc = petstore(&options());
        let payload = json!({ "name": "Rex", "tag": null, "owner": { "name": "Ann" } });
        assert!(validate_definition(&doc, "Pet", &payload).is_ok());
    }

    #[test]
    fn valid_payload_with_inlined_ref() {
        let doc = petstore(&options().resolve_refs(true));
        let payload = json!({ "name": "Rex", "owner": { "name": "Ann" } });
        assert!(validate_definition(&doc, "Pet", &payload).is_ok());
    }

    #[test]
    fn closed_objects_reject_unknown_fields() {
        let doc = petstore(&options());
        let payload = json!({ "name": "Rex", "color": "brown" });
        assert!(matches!(
            validate_definition(&doc, "Pet", &payload),
            Err(ValidateError::Invalid { .. })
        ));

        let open = petstore(&options().additional_properties(true));
        assert!(validate_definition(&open, "Pet", &payload).is_ok());
    }

    #[test]
    fn nested_errors_have_instance_paths() {
        let doc = petstore(&options());
        let payload = json!({ "name": "Rex", "owner": { "name": 5 } });
        match validate_definition(&doc, "Pet", &payload) {
            Err(ValidateError::Invalid { errors }) => {
                assert!(errors.iter().any(|e| e.path == "/owner/name"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn unknown_definition() {
        let doc = petstore(&options());
        assert!(matches!(
            validate_definition(&doc, "Cat", &json!({})),
            Err(ValidateError::UnknownDefinition { .. })
        ));
    }
}
