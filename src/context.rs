//! Data contexts loaded from JSON or TOML files
//!
//! A data context is a root object that templates and paths resolve against.
//! TOML files may carry an optional `[metadata]` table describing the
//! context; it is split off and never visible to lookups.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::path::RootList;
use crate::value::is_container;

/// Errors that can occur when loading or saving data contexts
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Failed to read data file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse JSON data: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to parse data TOML: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Failed to write data TOML: {0}")]
    TomlWriteError(#[from] toml::ser::Error),
    #[error("Unsupported data file format: {path} (expected .json or .toml)")]
    UnsupportedFormat { path: PathBuf },
    #[error("Expected {expected} for {what}, found {found}")]
    NotAnObject {
        what: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Data key `{key}` is reserved in TOML contexts")]
    ReservedKey { key: String },
}

/// Table name holding context metadata in TOML files
const METADATA_KEY: &str = "metadata";

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// On-disk format of a data context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataFormat {
    #[default]
    Json,
    Toml,
}

impl DataFormat {
    /// Pick a format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(DataFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Some(DataFormat::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFormat::Json => write!(f, "json"),
            DataFormat::Toml => write!(f, "toml"),
        }
    }
}

/// A root object for path lookups
#[derive(Debug, Clone, PartialEq)]
pub struct DataContext {
    /// The `[metadata]` table of a TOML context, kept verbatim
    pub metadata: Map<String, Value>,
    /// The data itself
    pub data: Value,
    /// Format the context was loaded from, used when saving
    pub format: DataFormat,
}

impl DataContext {
    /// Wrap an existing value
    pub fn new(data: Value) -> Self {
        Self {
            metadata: Map::new(),
            data,
            format: DataFormat::Json,
        }
    }

    /// Load a context from a `.json` or `.toml` file
    pub fn from_file(path: &Path) -> Result<Self, ContextError> {
        let format = DataFormat::from_path(path).ok_or_else(|| ContextError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), %format, "loading data context");
        match format {
            DataFormat::Json => Self::from_json_str(&content),
            DataFormat::Toml => Self::from_toml_str(&content),
        }
    }

    /// Parse a JSON document; the whole document is data
    ///
    /// The document must be an object (one root) or an array (one root per
    /// element).
    pub fn from_json_str(content: &str) -> Result<Self, ContextError> {
        let data: Value = serde_json::from_str(content)?;
        if !is_container(&data) {
            return Err(ContextError::NotAnObject {
                what: "JSON data",
                expected: "an object or array",
                found: kind_name(&data),
            });
        }
        Ok(Self::new(data))
    }

    /// Parse a TOML document, splitting off an optional `[metadata]` table
    pub fn from_toml_str(content: &str) -> Result<Self, ContextError> {
        let mut table: Map<String, Value> = toml::from_str(content)?;
        let metadata = match table.remove(METADATA_KEY) {
            Some(Value::Object(metadata)) => metadata,
            Some(other) => {
                return Err(ContextError::NotAnObject {
                    what: "[metadata]",
                    expected: "a table",
                    found: kind_name(&other),
                })
            }
            None => Map::new(),
        };

        Ok(DataContext {
            metadata,
            data: Value::Object(table),
            format: DataFormat::Toml,
        })
    }

    /// `metadata.name`, if present and a string
    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").and_then(Value::as_str)
    }

    /// `metadata.description`, if present and a string
    pub fn description(&self) -> Option<&str> {
        self.metadata.get("description").and_then(Value::as_str)
    }

    /// Serialize the context in its own format
    ///
    /// TOML contexts must hold an object, and that object may not use the
    /// `metadata` key, which would be read back as the metadata table.
    pub fn to_string_pretty(&self) -> Result<String, ContextError> {
        match self.format {
            DataFormat::Json => Ok(serde_json::to_string_pretty(&self.data)?),
            DataFormat::Toml => {
                let Value::Object(data) = &self.data else {
                    return Err(ContextError::NotAnObject {
                        what: "TOML data",
                        expected: "an object",
                        found: kind_name(&self.data),
                    });
                };
                if data.contains_key(METADATA_KEY) {
                    return Err(ContextError::ReservedKey {
                        key: METADATA_KEY.to_string(),
                    });
                }

                let mut table = data.clone();
                if !self.metadata.is_empty() {
                    table.insert(
                        METADATA_KEY.to_string(),
                        Value::Object(self.metadata.clone()),
                    );
                }
                Ok(toml::to_string_pretty(&table)?)
            }
        }
    }

    /// Write the context back to `path`
    pub fn save(&self, path: &Path) -> Result<(), ContextError> {
        let content = self.to_string_pretty()?;
        std::fs::write(path, content)?;
        debug!(path = %path.display(), format = %self.format, "saved data context");
        Ok(())
    }
}

impl Default for DataContext {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

/// Build a root list from several contexts, in order
///
/// A context whose data is an array contributes one root per element.
pub fn root_list(contexts: &mut [DataContext]) -> RootList<'_> {
    contexts
        .iter_mut()
        .flat_map(|ctx| RootList::from(&mut ctx.data))
        .collect()
}
