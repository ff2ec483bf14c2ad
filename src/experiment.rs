//! Validation of the uploaded experiment configuration file.
//!
//! The file is YAML. It is accepted when it parses to a non-empty mapping
//! with string keys; its contents are otherwise opaque to onboarding and
//! are migrated to object storage unchanged.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Reasons an uploaded configuration is rejected.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The upload is not UTF-8 text.
    #[error("configuration file is not valid UTF-8")]
    NotUtf8,
    /// The YAML does not parse.
    #[error("configuration file does not parse: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// The document is empty or null.
    #[error("configuration file is empty")]
    Empty,
    /// The top-level value is not a mapping.
    #[error("configuration file must be a mapping at the top level, found {0}")]
    NotAMapping(&'static str),
    /// A top-level key is not a string.
    #[error("configuration keys must be strings, found {0}")]
    NonStringKey(&'static str),
}

/// A parsed experiment configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    mapping: Mapping,
}

impl ExperimentConfig {
    /// Parses and validates configuration bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigFileError::NotUtf8`] for non-UTF-8 input, otherwise
    /// the errors of [`ExperimentConfig::parse`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigFileError> {
        let text = std::str::from_utf8(bytes).map_err(|_| ConfigFileError::NotUtf8)?;
        Self::parse(text)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not YAML, is empty, or is not a
    /// mapping with string keys.
    pub fn parse(text: &str) -> Result<Self, ConfigFileError> {
        if text.trim().is_empty() {
            return Err(ConfigFileError::Empty);
        }
        let value: Value = serde_yaml::from_str(text)?;
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Err(ConfigFileError::Empty),
            other => return Err(ConfigFileError::NotAMapping(kind(&other))),
        };
        if mapping.is_empty() {
            return Err(ConfigFileError::Empty);
        }
        if let Some(key) = mapping.keys().find(|k| !k.is_string()) {
            return Err(ConfigFileError::NonStringKey(kind(key)));
        }
        Ok(Self { mapping })
    }

    /// Top-level keys in document order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.mapping.keys().filter_map(Value::as_str).collect()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
