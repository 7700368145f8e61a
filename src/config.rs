//! Run configuration.
//!
//! Settings come from a JSON file (`ytoj.json` by default) and may be
//! overridden field by field, typically from command-line flags:
//!
//! ```json
//! {
//!   "yaml": "sample/petstore-simple.yaml",
//!   "json": "out/petstore-simple.json",
//!   "schema": "http://json-schema.org/draft-07/schema#",
//!   "id": "https://example.com/petstore.json",
//!   "resolveRefs": false,
//!   "additionalProperties": false
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::loader::is_url;
use crate::types::{ConvertOptions, Draft, DEFAULT_SCHEMA};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ytoj.json";

/// Settings as written in a config file or given as overrides.
///
/// Every field is optional so files and flags can be layered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    /// Swagger input: file path or URL.
    pub yaml: Option<String>,
    /// Output file path.
    pub json: Option<PathBuf>,
    pub schema: Option<String>,
    pub id: Option<String>,
    pub resolve_refs: Option<bool>,
    pub additional_properties: Option<bool>,
}

impl ConfigFile {
    /// Load settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist, or
    /// `ConfigError::InvalidJson` if it isn't a valid settings object.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layer `overrides` on top of these settings.
    pub fn merge(self, overrides: ConfigFile) -> Self {
        Self {
            yaml: overrides.yaml.or(self.yaml),
            json: overrides.json.or(self.json),
            schema: overrides.schema.or(self.schema),
            id: overrides.id.or(self.id),
            resolve_refs: overrides.resolve_refs.or(self.resolve_refs),
            additional_properties: overrides.additional_properties.or(self.additional_properties),
        }
    }

    /// Fill defaults and check that every required setting is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` for `yaml` or `id`. The output path
    /// is checked by [`Config::output`], since not every command writes one.
    pub fn build(self) -> Result<Config, ConfigError> {
        Ok(Config {
            yaml: self.yaml.ok_or(ConfigError::MissingField { field: "yaml" })?,
            json: self.json,
            schema: self.schema.unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
            id: self.id.ok_or(ConfigError::MissingField { field: "id" })?,
            resolve_refs: self.resolve_refs.unwrap_or(false),
            additional_properties: self.additional_properties.unwrap_or(false),
        })
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub yaml: String,
    pub json: Option<PathBuf>,
    pub schema: String,
    pub id: String,
    pub resolve_refs: bool,
    pub additional_properties: bool,
}

impl Config {
    /// Load a config file and apply overrides.
    ///
    /// A missing file is tolerated unless `required` is set, so overrides
    /// alone can describe a run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is unreadable or invalid, or if a
    /// required setting is missing after merging.
    pub fn load(path: &Path, required: bool, overrides: ConfigFile) -> Result<Self, ConfigError> {
        let file = match ConfigFile::load(path) {
            Ok(file) => file,
            Err(ConfigError::NotFound { .. }) if !required => {
                tracing::debug!(path = %path.display(), "no config file, using overrides only");
                ConfigFile::default()
            }
            Err(e) => return Err(e),
        };

        file.merge(overrides).build()
    }

    /// Check the input exists and the `$schema`/`$id` values are usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InputNotFound`, `ConfigError::InvalidSchema` or
    /// `ConfigError::InvalidId`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_url(&self.yaml) && !Path::new(&self.yaml).exists() {
            return Err(ConfigError::InputNotFound {
                path: PathBuf::from(&self.yaml),
            });
        }

        validate_schema_uri(&self.schema)?;
        validate_id(&self.id)
    }

    /// The output path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if no output was configured.
    pub fn output(&self) -> Result<&Path, ConfigError> {
        self.json
            .as_deref()
            .ok_or(ConfigError::MissingField { field: "json" })
    }

    /// Conversion options for this run.
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions::new(&self.schema, &self.id)
            .resolve_refs(self.resolve_refs)
            .additional_properties(self.additional_properties)
    }
}

/// Check that `$schema` names a known JSON Schema meta-schema.
///
/// # Errors
///
/// Returns `ConfigError::InvalidSchema` otherwise.
pub fn validate_schema_uri(schema: &str) -> Result<Draft, ConfigError> {
    Draft::from_uri(schema).ok_or_else(|| ConfigError::InvalidSchema {
        value: schema.to_string(),
    })
}

/// Check that `$id` is an absolute URI.
///
/// # Errors
///
/// Returns `ConfigError::InvalidId` otherwise.
pub fn validate_id(id: &str) -> Result<(), ConfigError> {
    Url::parse(id).map(|_| ()).map_err(|source| ConfigError::InvalidId {
        value: id.to_string(),
        source,
    })
}
