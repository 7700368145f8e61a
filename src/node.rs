//! Classification of Swagger schema nodes.
//!
//! A Swagger schema is an untyped tree. [`SchemaNode::classify`] derives the
//! node's shape once (`$ref` wins over `type`) so the transformer can match on
//! it instead of probing keys throughout.

use serde_json::{Map, Value};

/// Swagger 2.0 primitive type tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwaggerType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    File,
}

impl SwaggerType {
    /// Parse a `type` token. Returns `None` for anything Swagger doesn't define.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "object" => Some(SwaggerType::Object),
            "array" => Some(SwaggerType::Array),
            "string" => Some(SwaggerType::String),
            "integer" => Some(SwaggerType::Integer),
            "number" => Some(SwaggerType::Number),
            "boolean" => Some(SwaggerType::Boolean),
            "file" => Some(SwaggerType::File),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwaggerType::Object => "object",
            SwaggerType::Array => "array",
            SwaggerType::String => "string",
            SwaggerType::Integer => "integer",
            SwaggerType::Number => "number",
            SwaggerType::Boolean => "boolean",
            SwaggerType::File => "file",
        }
    }
}

/// Shape of a schema node, borrowed from the input tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaNode<'a> {
    /// `{"$ref": ...}`. Sibling keywords are ignored, as in Swagger.
    Reference(&'a Value),
    /// `type: object`.
    Object(&'a Map<String, Value>),
    /// `type: array`.
    Array(&'a Map<String, Value>),
    /// `string`, `integer`, `number` or `boolean`.
    Scalar(SwaggerType, &'a Map<String, Value>),
    /// `type: file`.
    File(&'a Map<String, Value>),
    /// No `type`, or a token Swagger doesn't define (e.g. composites,
    /// bare `properties`, `type` given as an array).
    Untyped(&'a Map<String, Value>),
    /// Anything that isn't a mapping (boolean schemas, malformed input).
    Literal(&'a Value),
}

impl<'a> SchemaNode<'a> {
    /// Derive the node's shape.
    pub fn classify(value: &'a Value) -> Self {
        let Value::Object(map) = value else {
            return SchemaNode::Literal(value);
        };

        if let Some(pointer) = map.get("$ref") {
            return SchemaNode::Reference(pointer);
        }

        match map.get("type").and_then(Value::as_str).and_then(SwaggerType::parse) {
            Some(SwaggerType::Object) => SchemaNode::Object(map),
            Some(SwaggerType::Array) => SchemaNode::Array(map),
            Some(SwaggerType::File) => SchemaNode::File(map),
            Some(scalar) => SchemaNode::Scalar(scalar, map),
            None => SchemaNode::Untyped(map),
        }
    }
}

/// Whether the node is marked nullable (`x-nullable: true` or `nullable: true`).
pub fn is_nullable(map: &Map<String, Value>) -> bool {
    ["x-nullable", "nullable"]
        .iter()
        .any(|key| map.get(*key).and_then(Value::as_bool).unwrap_or(false))
}
