//! Swagger definitions to JSON Schema transformation.
//!
//! Builds a new tree from the input, normalizing Swagger idioms:
//! - object schemas get an explicit `additionalProperties` default
//! - `type: file` becomes `type: string` (or fails, per [`FileTypePolicy`])
//! - `x-nullable` becomes a `[type, "null"]` union, or an `anyOf` with
//!   `{"type": "null"}` where the node has no single type (refs, composites)
//! - boolean `exclusiveMaximum`/`exclusiveMinimum` fold into numeric bounds (draft-06+)
//! - `example` becomes `examples` (draft-06+)
//! - Swagger-only keywords and `x-*` extensions are dropped
//!
//! `$ref`s are either validated and copied, or inlined with their targets
//! transformed in turn.

use serde_json::{json, Map, Value};

use crate::error::{ConvertError, ReferenceError};
use crate::node::{is_nullable, SchemaNode};
use crate::resolver::{self, definition_pointer, escape_segment, RefPath};
use crate::types::{
    json_type_name, ConvertOptions, Definitions, Draft, ExternalRefPolicy, FileTypePolicy,
    JsonSchemaDocument,
};

/// Swagger keywords with no JSON Schema counterpart.
const SWAGGER_ONLY_KEYWORDS: &[&str] = &[
    "discriminator",
    "xml",
    "externalDocs",
    "collectionFormat",
    "allowEmptyValue",
    "x-nullable",
    "nullable",
];

/// Convert a definitions map into a JSON Schema document.
///
/// Each definition is transformed independently. In resolve mode a
/// definition's own pointer seeds the cycle chain, so a definition that
/// reaches itself fails at the first repetition. A recognized `$schema` is
/// written in its canonical spelling.
///
/// # Errors
///
/// Returns `ConvertError` on the first broken, circular (resolve mode only) or
/// unsupported reference, or on `type: file` under [`FileTypePolicy::Reject`].
pub fn transform(
    definitions: &Definitions,
    options: &ConvertOptions,
) -> Result<JsonSchemaDocument, ConvertError> {
    let transformer = Transformer::new(definitions, options);
    let mut converted = Definitions::new();

    for (name, schema) in definitions {
        tracing::debug!(definition = %name, "converting definition");
        let pointer = definition_pointer(name);
        let root = RefPath::new();
        let visiting = root.push(&pointer);
        let scope = Scope {
            definition: name,
            visiting: &visiting,
        };
        converted.insert(name.clone(), transformer.node(schema, &scope, &pointer)?);
    }

    let schema = Draft::from_uri(&options.schema)
        .map_or_else(|| options.schema.clone(), |draft| draft.uri().to_string());

    Ok(JsonSchemaDocument {
        schema,
        id: options.id.clone(),
        definitions: converted,
    })
}

/// Transform a single schema node against `definitions`.
///
/// Error locations are relative to `#`.
///
/// # Errors
///
/// Same as [`transform`].
pub fn transform_node(
    node: &Value,
    definitions: &Definitions,
    options: &ConvertOptions,
) -> Result<Value, ConvertError> {
    let transformer = Transformer::new(definitions, options);
    let root = RefPath::new();
    let scope = Scope {
        definition: "",
        visiting: &root,
    };
    transformer.node(node, &scope, "#")
}

struct Transformer<'d> {
    definitions: &'d Definitions,
    options: &'d ConvertOptions,
    draft: Draft,
}

/// Per-branch state: the definition being converted and the refs being inlined.
struct Scope<'s> {
    definition: &'s str,
    visiting: &'s RefPath<'s>,
}

impl<'d> Transformer<'d> {
    fn new(definitions: &'d Definitions, options: &'d ConvertOptions) -> Self {
        Self {
            definitions,
            options,
            draft: options.draft(),
        }
    }

    fn node(&self, value: &Value, scope: &Scope<'_>, path: &str) -> Result<Value, ConvertError> {
        let out = match SchemaNode::classify(value) {
            SchemaNode::Reference(pointer) => self.reference(pointer, scope, path),
            SchemaNode::Object(map) => {
                let mut out = self.keywords(map, Some("object"), scope, path)?;
                if !out.contains_key("additionalProperties") {
                    out.insert(
                        "additionalProperties".to_string(),
                        Value::Bool(self.options.additional_properties),
                    );
                }
                Ok(Value::Object(out))
            }
            SchemaNode::Array(map) => Ok(Value::Object(self.keywords(map, Some("array"), scope, path)?)),
            SchemaNode::Scalar(ty, map) => {
                Ok(Value::Object(self.keywords(map, Some(ty.as_str()), scope, path)?))
            }
            SchemaNode::File(map) => match self.options.file_type {
                FileTypePolicy::AsString => {
                    tracing::warn!(path, "mapping type \"file\" to \"string\"");
                    let mut out = self.keywords(map, Some("string"), scope, path)?;
                    if !out.contains_key("format") {
                        out.insert("format".to_string(), json!("binary"));
                    }
                    Ok(Value::Object(out))
                }
                FileTypePolicy::Reject => Err(ConvertError::UnsupportedFileType {
                    definition: scope.definition.to_string(),
                    path: path.to_string(),
                }),
            },
            SchemaNode::Untyped(map) => Ok(Value::Object(self.keywords(map, None, scope, path)?)),
            SchemaNode::Literal(value) => Ok(value.clone()),
        }?;

        match value {
            Value::Object(map) if is_nullable(map) => Ok(with_null(out)),
            _ => Ok(out),
        }
    }

    fn reference(
        &self,
        pointer: &Value,
        scope: &Scope<'_>,
        path: &str,
    ) -> Result<Value, ConvertError> {
        let Value::String(pointer) = pointer else {
            return Err(ConvertError::InvalidReference {
                definition: scope.definition.to_string(),
                path: path.to_string(),
                actual: json_type_name(pointer).to_string(),
            });
        };

        let at = |source: ReferenceError| ConvertError::Reference {
            definition: scope.definition.to_string(),
            path: path.to_string(),
            source,
        };

        if !self.options.resolve_refs {
            match resolver::lookup(pointer, self.definitions) {
                Ok(_) => {}
                Err(ReferenceError::UnsupportedForm { .. })
                    if self.options.external_refs == ExternalRefPolicy::Preserve =>
                {
                    tracing::debug!(pointer = %pointer, path, "preserving external reference");
                }
                Err(e) => return Err(at(e)),
            }
            return Ok(json!({ "$ref": pointer }));
        }

        let target = resolver::resolve(pointer, self.definitions, scope.visiting).map_err(at)?;
        tracing::debug!(pointer = %pointer, depth = scope.visiting.len(), "inlining reference");

        let visiting = scope.visiting.push(pointer);
        let inner = Scope {
            definition: scope.definition,
            visiting: &visiting,
        };
        self.node(target, &inner, path)
    }

    /// Transform the keywords of a mapping node.
    ///
    /// `json_type` is the type to emit for typed nodes; `None` copies `type` as-is.
    fn keywords(
        &self,
        map: &Map<String, Value>,
        json_type: Option<&str>,
        scope: &Scope<'_>,
        path: &str,
    ) -> Result<Map<String, Value>, ConvertError> {
        let mut out = Map::new();

        for (key, value) in map {
            let child_path = format!("{}/{}", path, escape_segment(key));

            match key.as_str() {
                "type" => {
                    let ty = match json_type {
                        Some(ty) => json!(ty),
                        None => value.clone(),
                    };
                    out.insert(key.clone(), ty);
                }
                "properties" | "patternProperties" | "dependencies" | "definitions" => {
                    // Array-valued dependencies come back as literals
                    let properties = self.schema_map(value, scope, &child_path)?;
                    out.insert(key.clone(), properties);
                }
                "items" => {
                    // Tuple form isn't Swagger, but handle it like a composite
                    let items = if value.is_array() {
                        self.schema_list(value, scope, &child_path)?
                    } else {
                        self.node(value, scope, &child_path)?
                    };
                    out.insert(key.clone(), items);
                }
                "additionalProperties" | "additionalItems" | "not" | "contains"
                | "propertyNames" | "if" | "then" | "else" => {
                    // Booleans pass through
                    out.insert(key.clone(), self.node(value, scope, &child_path)?);
                }
                "allOf" | "anyOf" | "oneOf" => {
                    let branches = self.schema_list(value, scope, &child_path)?;
                    out.insert(key.clone(), branches);
                }
                "required" => {
                    // Parameter-style `required: true` has no schema meaning
                    if value.is_array() {
                        out.insert(key.clone(), value.clone());
                    }
                }
                "example" => {
                    if self.draft.has_examples() && !map.contains_key("examples") {
                        out.insert("examples".to_string(), json!([value]));
                    }
                }
                "maximum" | "minimum" => {
                    let exclusive = if key == "maximum" {
                        "exclusiveMaximum"
                    } else {
                        "exclusiveMinimum"
                    };
                    let folds = self.draft.numeric_exclusive_bounds()
                        && map.get(exclusive) == Some(&Value::Bool(true));
                    if folds {
                        out.insert(exclusive.to_string(), value.clone());
                    } else {
                        out.insert(key.clone(), value.clone());
                    }
                }
                "exclusiveMaximum" | "exclusiveMinimum" => {
                    // Boolean form is folded into maximum/minimum above
                    if !(value.is_boolean() && self.draft.numeric_exclusive_bounds()) {
                        out.insert(key.clone(), value.clone());
                    }
                }
                other if other.starts_with("x-") || SWAGGER_ONLY_KEYWORDS.contains(&other) => {}
                _ => {
                    out.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(out)
    }

    /// Transform every value of a name -> schema mapping.
    fn schema_map(&self, value: &Value, scope: &Scope<'_>, path: &str) -> Result<Value, ConvertError> {
        let Some(entries) = value.as_object() else {
            return Ok(value.clone());
        };

        let mut result = Map::new();
        for (name, schema) in entries {
            let entry_path = format!("{}/{}", path, escape_segment(name));
            result.insert(name.clone(), self.node(schema, scope, &entry_path)?);
        }

        Ok(Value::Object(result))
    }

    /// Transform every entry of an ordered schema list.
    fn schema_list(&self, value: &Value, scope: &Scope<'_>, path: &str) -> Result<Value, ConvertError> {
        let Some(entries) = value.as_array() else {
            return Ok(value.clone());
        };

        let mut result = Vec::with_capacity(entries.len());
        for (i, schema) in entries.iter().enumerate() {
            let entry_path = format!("{}/{}", path, i);
            result.push(self.node(schema, scope, &entry_path)?);
        }

        Ok(Value::Array(result))
    }
}

/// Allow `null` in addition to what `schema` accepts.
///
/// A single `type` (or type list) gains `"null"`, and so does any `enum`.
/// Schemas without a type are wrapped in `anyOf`.
fn with_null(schema: Value) -> Value {
    let Value::Object(mut map) = schema else {
        return json!({ "anyOf": [schema, { "type": "null" }] });
    };

    let mut types = match map.get("type") {
        Some(Value::String(ty)) => vec![json!(ty)],
        Some(Value::Array(types)) => types.clone(),
        _ => return json!({ "anyOf": [Value::Object(map), { "type": "null" }] }),
    };
    if !types.contains(&json!("null")) {
        types.push(json!("null"));
    }
    map.insert("type".to_string(), Value::Array(types));

    if let Some(Value::Array(values)) = map.get_mut("enum") {
        if !values.contains(&Value::Null) {
            values.push(Value::Null);
        }
    }

    Value::Object(map)
}
