//! Swagger 2.0 to JSON Schema
//!
//! Converts the `definitions` of a Swagger 2.0 document into a standalone
//! JSON Schema document (draft-07 by default).
//!
//! # Example
//!
//! ```
//! use ytoj::{transform, ConvertOptions};
//! use serde_json::json;
//!
//! let definitions = json!({
//!     "Pet": {
//!         "type": "object",
//!         "properties": {
//!             "name": { "type": "string" },
//!             "owner": { "$ref": "#/definitions/Owner" }
//!         },
//!         "required": ["name"]
//!     },
//!     "Owner": { "type": "string" }
//! });
//! let definitions = definitions.as_object().unwrap();
//!
//! let options = ConvertOptions::new(
//!     "http://json-schema.org/draft-07/schema#",
//!     "https://example.com/petstore.json",
//! )
//! .resolve_refs(true);
//! let document = transform(definitions, &options).unwrap();
//!
//! let pet = &document.definitions["Pet"];
//! assert_eq!(pet["properties"]["owner"], json!({ "type": "string" }));
//! assert_eq!(pet["additionalProperties"], json!(false));
//! ```
//!
//! # Conversion Rules
//!
//! | Swagger | JSON Schema |
//! |---------|-------------|
//! | `type: object` without `additionalProperties` | configured default added |
//! | `type: file` | `type: string`, `format: binary` |
//! | `x-nullable: true` | `type: [t, "null"]`, or `anyOf` with `{"type": "null"}` |
//! | `$ref: '#/definitions/X'` | kept, or inlined with `resolve_refs` |
//! | `discriminator`, `xml`, `externalDocs`, `x-*` | dropped |
//!
//! Only `#/definitions/<name>` references are supported. Circular references
//! are fine while references are kept, and an error when inlining.

mod config;
mod error;
mod loader;
mod node;
mod resolver;
mod transform;
mod types;
mod validator;

pub use config::{
    validate_id, validate_schema_uri, Config, ConfigFile, DEFAULT_CONFIG_FILE,
};
pub use error::{ConfigError, ConvertError, LoadError, ReferenceError, SchemaError, ValidateError};
pub use loader::{is_url, load_definitions, load_definitions_auto, load_definitions_str, write_document};
pub use node::{SchemaNode, SwaggerType};
pub use resolver::{definition_pointer, lookup, parse_pointer, resolve, RefPath, DEFINITIONS_PREFIX};
pub use transform::{transform, transform_node};
pub use types::{
    ConvertOptions, Definitions, Draft, ExternalRefPolicy, FileTypePolicy, JsonSchemaDocument,
    DEFAULT_SCHEMA,
};
pub use validator::{check_document, validate_against_schema, validate_definition};

#[cfg(feature = "remote")]
pub use loader::load_definitions_url;
