//! Error types for configuration, loading, conversion and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors resolving a single `$ref` pointer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("unsupported reference \"{pointer}\": expected #/definitions/<name>")]
    UnsupportedForm { pointer: String },

    #[error("unresolved reference \"{pointer}\": no such definition")]
    Unresolved { pointer: String },

    #[error("circular reference: {}", chain.join(" -> "))]
    Circular { chain: Vec<String> },
}

impl ReferenceError {
    /// The pointer that failed. For cycles, the repeated pointer.
    pub fn pointer(&self) -> &str {
        match self {
            Self::UnsupportedForm { pointer } | Self::Unresolved { pointer } => pointer,
            Self::Circular { chain } => chain.last().map(String::as_str).unwrap_or_default(),
        }
    }
}

/// Errors during conversion of the definitions tree.
///
/// `path` is the JSON Pointer of the failing node in the output document
/// (e.g. `#/definitions/Pet/properties/owner`).
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{path}: {source}")]
    Reference {
        definition: String,
        path: String,
        #[source]
        source: ReferenceError,
    },

    #[error("{path}: $ref must be a string, got {actual}")]
    InvalidReference {
        definition: String,
        path: String,
        actual: String,
    },

    #[error("{path}: type \"file\" has no JSON Schema equivalent")]
    UnsupportedFileType { definition: String, path: String },
}

impl ConvertError {
    /// Name of the top-level definition being converted when the error occurred.
    pub fn definition(&self) -> &str {
        match self {
            Self::Reference { definition, .. }
            | Self::InvalidReference { definition, .. }
            | Self::UnsupportedFileType { definition, .. } => definition,
        }
    }

    /// The underlying reference error, if any.
    pub fn reference_error(&self) -> Option<&ReferenceError> {
        match self {
            Self::Reference { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors reading the Swagger input or writing the generated schema.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("Input file {} is not found.", path.display())]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid YAML: {source}")]
    InvalidYaml {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid Swagger document: {message}")]
    InvalidDocument { message: String },

    #[error("cannot serialize schema: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. }
            | LoadError::ReadError { .. }
            | LoadError::WriteError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors loading or validating the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {} is not found", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing required setting \"{field}\"")]
    MissingField { field: &'static str },

    #[error("Input file {} is not found.", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Invalid $schema \"{value}\": expected a JSON Schema meta-schema URI")]
    InvalidSchema { value: String },

    #[error("Invalid $id \"{value}\": Invalid URL ({source})")]
    InvalidId {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

impl ConfigError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors during validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("unknown definition \"{name}\"")]
    UnknownDefinition { name: String },

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("validation failed with {} error(s)", errors.len())]
    Invalid { errors: Vec<SchemaError> },
}

/// Single validation error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid field.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Convert(e) => e.exit_code(),
            ValidateError::UnknownDefinition { .. } => 2,
            ValidateError::InvalidSchema { .. } | ValidateError::Invalid { .. } => 1,
        }
    }
}
