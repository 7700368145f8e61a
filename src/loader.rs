//! Swagger loading and schema writing.
//!
//! Reads Swagger YAML from files, strings, and HTTP URLs, extracting the
//! `definitions` section as JSON. Writes generated documents to disk.

use std::path::Path;

use serde_json::{Map, Number, Value};
use serde_yaml::{Mapping, Value as Yaml};

use crate::error::LoadError;
use crate::types::{Definitions, JsonSchemaDocument};

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load the `definitions` of a Swagger file.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// `LoadError::InvalidYaml` if it isn't valid YAML, or
/// `LoadError::InvalidDocument` if its `definitions` can't be represented as JSON.
pub fn load_definitions(path: &Path) -> Result<Definitions, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_definitions_str(&content)
}

/// Load the `definitions` of a Swagger document given as YAML text.
///
/// A document without `definitions` yields an empty map.
///
/// # Errors
///
/// Returns `LoadError::InvalidYaml` or `LoadError::InvalidDocument`.
pub fn load_definitions_str(content: &str) -> Result<Definitions, LoadError> {
    let mut document: Yaml =
        serde_yaml::from_str(content).map_err(|source| LoadError::InvalidYaml { source })?;
    document
        .apply_merge()
        .map_err(|source| LoadError::InvalidYaml { source })?;

    let Yaml::Mapping(root) = &document else {
        return Err(LoadError::InvalidDocument {
            message: "top level must be a mapping".to_string(),
        });
    };

    match root.get("swagger") {
        Some(version) if yaml_scalar_key(version).as_deref() == Some("2.0") => {}
        Some(version) => {
            tracing::warn!(version = ?version, "not a Swagger 2.0 document, converting anyway");
        }
        None => tracing::warn!("document has no \"swagger\" version field"),
    }

    match root.get("definitions") {
        None | Some(Yaml::Null) => {
            tracing::warn!("document has no definitions");
            Ok(Definitions::new())
        }
        Some(Yaml::Mapping(definitions)) => yaml_mapping_to_json(definitions, "#/definitions"),
        Some(_) => Err(LoadError::InvalidDocument {
            message: "definitions must be a mapping".to_string(),
        }),
    }
}

/// Load the `definitions` of a Swagger document served over HTTP/HTTPS.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails, otherwise
/// the same errors as [`load_definitions_str`].
#[cfg(feature = "remote")]
pub fn load_definitions_url(url: &str) -> Result<Definitions, LoadError> {
    let network_error = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    let content = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(network_error)?;

    load_definitions_str(&content)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load `definitions` from a file path or URL.
///
/// URL loading requires the `remote` feature.
///
/// # Errors
///
/// Returns appropriate errors based on the source type.
pub fn load_definitions_auto(source: &str) -> Result<Definitions, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_definitions_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_definitions(Path::new(source))
    }
}

/// Write a document as pretty-printed JSON.
///
/// Missing parent directories are created; an existing file is overwritten.
///
/// # Errors
///
/// Returns `LoadError::WriteError` if the directory or file can't be written.
pub fn write_document(document: &JsonSchemaDocument, path: &Path) -> Result<(), LoadError> {
    let mut text = document
        .to_json_pretty()
        .map_err(|source| LoadError::Serialize { source })?;
    text.push('\n');

    let write_error = |source| LoadError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }

    std::fs::write(path, text).map_err(write_error)?;
    tracing::debug!(path = %path.display(), "wrote schema");
    Ok(())
}

/// Convert a YAML node to JSON.
///
/// Scalar mapping keys are stringified (`200:` becomes `"200"`) and tags are
/// dropped. `path` locates the node for error messages.
fn yaml_to_json(value: &Yaml, path: &str) -> Result<Value, LoadError> {
    match value {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(*b)),
        Yaml::Number(n) => yaml_number(n, path),
        Yaml::String(s) => Ok(Value::String(s.clone())),
        Yaml::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| yaml_to_json(item, &format!("{}/{}", path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Mapping(mapping) => yaml_mapping_to_json(mapping, path).map(Value::Object),
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value, path),
    }
}

fn yaml_mapping_to_json(mapping: &Mapping, path: &str) -> Result<Map<String, Value>, LoadError> {
    let mut map = Map::new();
    for (key, item) in mapping {
        let key = yaml_scalar_key(key).ok_or_else(|| LoadError::InvalidDocument {
            message: format!("{}: mapping keys must be scalars", path),
        })?;
        let item = yaml_to_json(item, &format!("{}/{}", path, key))?;
        map.insert(key, item);
    }
    Ok(map)
}

fn yaml_number(n: &serde_yaml::Number, path: &str) -> Result<Value, LoadError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Number(i.into()));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::Number(u.into()));
    }
    n.as_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| LoadError::InvalidDocument {
            message: format!("{}: {} is not representable in JSON", path, n),
        })
}

/// Render a scalar YAML node as a JSON object key.
fn yaml_scalar_key(value: &Yaml) -> Option<String> {
    match value {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Number(n) => Some(n.to_string()),
        Yaml::Bool(b) => Some(b.to_string()),
        Yaml::Null => Some("null".to_string()),
        Yaml::Tagged(tagged) => yaml_scalar_key(&tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const PETSTORE: &str = r#"
swagger: "2.0"
info:
  title: Petstore
  version: 1.0.0
paths:
  /pets:
    get:
      responses:
        200:
          description: pets
definitions:
  Pet:
    type: object
    required:
      - name
    properties:
      name:
        type: string
      id:
        type: integer
        format: int64
"#;

    #[test]
    fn load_definitions_str_extracts_definitions() {
        let defs = load_definitions_str(PETSTORE).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(
            defs["Pet"],
            json!({
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": { "type": "string" },
                    "id": { "type": "integer", "format": "int64" }
                }
            })
        );
    }

    #[test]
    fn property_order_preserved() {
        let defs = load_definitions_str(PETSTORE).unwrap();
        let names: Vec<&String> = defs["Pet"]["properties"].as_object().unwrap().keys().collect();
        assert_eq!(names, ["name", "id"]);
    }

    #[test]
    fn missing_definitions_is_empty() {
        let defs = load_definitions_str("swagger: \"2.0\"\npaths: {}\n").unwrap();
        assert!(defs.is_empty());
    }

    #[test]
    fn definitions_must_be_mapping() {
        let result = load_definitions_str("swagger: \"2.0\"\ndefinitions: [a, b]\n");
        assert!(matches!(result, Err(LoadError::InvalidDocument { .. })));
    }

    #[test]
    fn top_level_must_be_mapping() {
        let result = load_definitions_str("- just\n- a list\n");
        assert!(matches!(result, Err(LoadError::InvalidDocument { .. })));
    }

    #[test]
    fn invalid_yaml() {
        let result = load_definitions_str("definitions: [unclosed");
        assert!(matches!(result, Err(LoadError::InvalidYaml { .. })));
    }

    #[test]
    fn anchors_and_merge_keys_resolved() {
        let yaml = r#"
swagger: "2.0"
definitions:
  Base: &base
    type: object
    properties:
      id:
        type: integer
  Derived:
    <<: *base
    description: derived
"#;
        let defs = load_definitions_str(yaml).unwrap();
        assert_eq!(defs["Derived"]["type"], "object");
        assert_eq!(defs["Derived"]["description"], "derived");
        assert_eq!(defs["Derived"]["properties"]["id"]["type"], "integer");
    }

    #[test]
    fn scalar_keys_and_values_converted() {
        let yaml = r#"
definitions:
  Codes:
    type: integer
    enum: [200, 404, 1.5, true, null]
    x-codes:
      200: ok
"#;
        let defs = load_definitions_str(yaml).unwrap();
        assert_eq!(defs["Codes"]["enum"], json!([200, 404, 1.5, true, null]));
        assert_eq!(defs["Codes"]["x-codes"]["200"], "ok");
    }

    #[test]
    fn non_finite_numbers_rejected() {
        let yaml = "definitions:\n  Big:\n    type: number\n    maximum: .inf\n";
        let result = load_definitions_str(yaml);
        assert!(matches!(result, Err(LoadError::InvalidDocument { .. })));
    }

    #[test]
    fn load_definitions_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", PETSTORE).unwrap();

        let defs = load_definitions(file.path()).unwrap();
        assert!(defs.contains_key("Pet"));
    }

    #[test]
    fn load_definitions_file_not_found() {
        let result = load_definitions(Path::new("/nonexistent/never.yaml"));
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn is_url_detection() {
        assert!(is_url("https://example.com/petstore.yaml"));
        assert!(is_url("http://example.com/petstore.yaml"));
        assert!(!is_url("sample/petstore.yaml"));
        assert!(!is_url("/abs/petstore.yaml"));
    }

    #[test]
    fn load_definitions_auto_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", PETSTORE).unwrap();

        let defs = load_definitions_auto(file.path().to_str().unwrap()).unwrap();
        assert!(defs.contains_key("Pet"));
    }

    fn document() -> JsonSchemaDocument {
        JsonSchemaDocument {
            schema: "http://json-schema.org/draft-07/schema#".into(),
            id: "tel:123-456-7890".into(),
            definitions: Definitions::new(),
        }
    }

    #[test]
    fn write_document_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("never").join("never.json");

        write_document(&document(), &path).unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, document().to_value());
    }

    #[test]
    fn write_document_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ever.json");
        std::fs::write(&path, "Lorem ipsum dolor sit amet").unwrap();

        write_document(&document(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("{\n"));
        assert!(content.ends_with("}\n"));
    }

    #[cfg(feature = "remote")]
    mod remote {
        use super::*;

        #[test]
        fn load_definitions_url_valid() {
            let mut server = mockito::Server::new();
            let mock = server
                .mock("GET", "/petstore.yaml")
                .with_status(200)
                .with_body(PETSTORE)
                .create();

            let url = format!("{}/petstore.yaml", server.url());
            let defs = load_definitions_url(&url).unwrap();
            assert!(defs.contains_key("Pet"));
            mock.assert();
        }

        #[test]
        fn load_definitions_url_404() {
            let mut server = mockito::Server::new();
            let _mock = server.mock("GET", "/missing.yaml").with_status(404).create();

            let url = format!("{}/missing.yaml", server.url());
            let result = load_definitions_url(&url);
            assert!(matches!(result, Err(LoadError::NetworkError { .. })));
        }

        #[test]
        fn load_definitions_auto_url() {
            let mut server = mockito::Server::new();
            let _mock = server
                .mock("GET", "/petstore.yaml")
                .with_status(200)
                .with_body(PETSTORE)
                .create();

            let url = format!("{}/petstore.yaml", server.url());
            assert!(load_definitions_auto(&url).is_ok());
        }
    }
}
