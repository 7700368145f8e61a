//! Core types for Swagger to JSON Schema conversion.

use serde::Serialize;
use serde_json::{Map, Value};

/// The `definitions` section of a Swagger document, keyed by definition name.
pub type Definitions = Map<String, Value>;

/// Default `$schema` written to generated documents.
pub const DEFAULT_SCHEMA: &str = "http://json-schema.org/draft-07/schema#";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// JSON Schema draft targeted by the generated document.
///
/// Derived from the `$schema` URI. Controls keyword translations that differ
/// between drafts (boolean vs numeric `exclusiveMaximum`, `example` vs `examples`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Draft {
    Draft4,
    Draft6,
    #[default]
    Draft7,
    Draft201909,
    Draft202012,
}

impl Draft {
    /// Parse a meta-schema URI.
    ///
    /// Accepts `http` and `https`, with or without the trailing empty fragment.
    /// Returns `None` for anything that is not a known meta-schema.
    pub fn from_uri(uri: &str) -> Option<Self> {
        let trimmed = uri.trim().trim_end_matches('#');
        let rest = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))?;

        match rest {
            "json-schema.org/draft-04/schema" => Some(Draft::Draft4),
            "json-schema.org/draft-06/schema" => Some(Draft::Draft6),
            "json-schema.org/draft-07/schema" => Some(Draft::Draft7),
            "json-schema.org/draft/2019-09/schema" => Some(Draft::Draft201909),
            "json-schema.org/draft/2020-12/schema" => Some(Draft::Draft202012),
            _ => None,
        }
    }

    /// Canonical meta-schema URI for this draft.
    pub fn uri(&self) -> &'static str {
        match self {
            Draft::Draft4 => "http://json-schema.org/draft-04/schema#",
            Draft::Draft6 => "http://json-schema.org/draft-06/schema#",
            Draft::Draft7 => "http://json-schema.org/draft-07/schema#",
            Draft::Draft201909 => "https://json-schema.org/draft/2019-09/schema",
            Draft::Draft202012 => "https://json-schema.org/draft/2020-12/schema",
        }
    }

    /// Whether `exclusiveMaximum`/`exclusiveMinimum` take numbers (draft-06+)
    /// rather than booleans modifying `maximum`/`minimum`.
    pub fn numeric_exclusive_bounds(&self) -> bool {
        *self >= Draft::Draft6
    }

    /// Whether the `examples` keyword exists (draft-06+).
    pub fn has_examples(&self) -> bool {
        *self >= Draft::Draft6
    }
}

/// What to do with Swagger's `file` type, which has no JSON Schema equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileTypePolicy {
    /// Rewrite `type: file` to `type: string`.
    #[default]
    AsString,
    /// Fail the conversion.
    Reject,
}

/// What to do with `$ref` values that are not `#/definitions/<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExternalRefPolicy {
    /// Fail the conversion.
    #[default]
    Reject,
    /// Copy the reference through unchanged. Only honored when refs are not
    /// being resolved; inlining still requires internal pointers.
    Preserve,
}

/// Options for a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Value written to the top-level `$schema`.
    pub schema: String,
    /// Value written to the top-level `$id`. Expected to be pre-validated.
    pub id: String,
    /// Inline every `$ref` instead of copying it through.
    pub resolve_refs: bool,
    /// `additionalProperties` applied to object schemas that don't set it.
    pub additional_properties: bool,
    pub file_type: FileTypePolicy,
    pub external_refs: ExternalRefPolicy,
}

impl ConvertOptions {
    /// Create options that preserve `$ref`s and close object schemas
    /// (`additionalProperties: false`).
    pub fn new(schema: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            id: id.into(),
            resolve_refs: false,
            additional_properties: false,
            file_type: FileTypePolicy::default(),
            external_refs: ExternalRefPolicy::default(),
        }
    }

    /// Inline `$ref`s (true) or copy them through (false).
    pub fn resolve_refs(mut self, resolve_refs: bool) -> Self {
        self.resolve_refs = resolve_refs;
        self
    }

    /// Set the default `additionalProperties` for object schemas.
    pub fn additional_properties(mut self, additional_properties: bool) -> Self {
        self.additional_properties = additional_properties;
        self
    }

    pub fn file_type(mut self, policy: FileTypePolicy) -> Self {
        self.file_type = policy;
        self
    }

    pub fn external_refs(mut self, policy: ExternalRefPolicy) -> Self {
        self.external_refs = policy;
        self
    }

    /// Draft implied by `schema`. Unknown URIs fall back to draft-07.
    pub fn draft(&self) -> Draft {
        Draft::from_uri(&self.schema).unwrap_or_default()
    }
}

/// A generated JSON Schema document.
///
/// Serializes as `{"$schema", "$id", "definitions"}` in that order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSchemaDocument {
    #[serde(rename = "$schema")]
    pub schema: String,
    #[serde(rename = "$id")]
    pub id: String,
    pub definitions: Definitions,
}

impl JsonSchemaDocument {
    /// The document as a JSON value.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("$schema".to_string(), Value::String(self.schema.clone()));
        map.insert("$id".to_string(), Value::String(self.id.clone()));
        map.insert(
            "definitions".to_string(),
            Value::Object(self.definitions.clone()),
        );
        Value::Object(map)
    }

    /// Pretty-printed JSON text.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn draft_from_uri_known() {
        assert_eq!(
            Draft::from_uri("http://json-schema.org/draft-07/schema#"),
            Some(Draft::Draft7)
        );
        assert_eq!(
            Draft::from_uri("http://json-schema.org/draft-04/schema"),
            Some(Draft::Draft4)
        );
        assert_eq!(
            Draft::from_uri("https://json-schema.org/draft/2020-12/schema"),
            Some(Draft::Draft202012)
        );
        assert_eq!(
            Draft::from_uri("https://json-schema.org/draft-06/schema#"),
            Some(Draft::Draft6)
        );
    }

    #[test]
    fn draft_from_uri_unknown() {
        assert_eq!(Draft::from_uri("http://www.example.com"), None);
        assert_eq!(Draft::from_uri("draft-07"), None);
        assert_eq!(Draft::from_uri(""), None);
    }

    #[test]
    fn draft_uri_round_trips() {
        for draft in [
            Draft::Draft4,
            Draft::Draft6,
            Draft::Draft7,
            Draft::Draft201909,
            Draft::Draft202012,
        ] {
            assert_eq!(Draft::from_uri(draft.uri()), Some(draft));
        }
    }

    #[test]
    fn draft_capabilities() {
        assert!(!Draft::Draft4.numeric_exclusive_bounds());
        assert!(Draft::Draft6.numeric_exclusive_bounds());
        assert!(!Draft::Draft4.has_examples());
        assert!(Draft::Draft202012.has_examples());
    }

    #[test]
    fn convert_options_defaults() {
        let opts = ConvertOptions::new(DEFAULT_SCHEMA, "tel:123-456-7890");
        assert!(!opts.resolve_refs);
        assert!(!opts.additional_properties);
        assert_eq!(opts.file_type, FileTypePolicy::AsString);
        assert_eq!(opts.external_refs, ExternalRefPolicy::Reject);
        assert_eq!(opts.draft(), Draft::Draft7);
    }

    #[test]
    fn convert_options_unknown_schema_falls_back_to_draft7() {
        let opts = ConvertOptions::new("urn:custom-meta", "tel:1");
        assert_eq!(opts.draft(), Draft::Draft7);
    }

    #[test]
    fn document_serializes_in_key_order() {
        let mut definitions = Definitions::new();
        definitions.insert("Pet".into(), json!({ "type": "object" }));
        let doc = JsonSchemaDocument {
            schema: DEFAULT_SCHEMA.into(),
            id: "tel:123-456-7890".into(),
            definitions,
        };

        let text = serde_json::to_string(&doc).unwrap();
        assert!(text.starts_with(r#"{"$schema":"#));
        assert!(text.find("$id").unwrap() < text.find("definitions").unwrap());
        assert_eq!(serde_json::to_value(&doc).unwrap(), doc.to_value());
    }
}
