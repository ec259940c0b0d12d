//! Error types for iotctllib

use std::path::PathBuf;
use thiserror::Error;

/// Message used when a field definition has no way to produce a label or value.
pub const MISSING_PROP_MESSAGE: &str = "both label and value are required if prop is not specified";

/// Errors that can occur while formatting output or loading CLI inputs
#[derive(Error, Debug)]
pub enum IotctlError {
    /// A field definition can produce neither a label nor a value
    #[error("{0}")]
    Configuration(String),

    /// An item could not be converted into a structured value
    #[error("failed to convert item for display: {0}")]
    Serialize(serde_json::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML encoding or decoding failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file exists but could not be parsed
    #[error("invalid config file '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A resource lookup found nothing
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IotctlError {
    /// The error raised for a definition lacking both `prop` and `label`/`value`.
    pub fn missing_prop() -> Self {
        IotctlError::Configuration(MISSING_PROP_MESSAGE.to_string())
    }
}
