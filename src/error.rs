//! Error types for the sample catalogue
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Sample catalogue error types
#[derive(Error, Debug)]
pub enum Error {
    /// Results root (or another required directory) is missing
    #[error("Not a directory: {}\nCreate the results root before cataloguing samples", .path.display())]
    NotADirectory {
        /// Offending path
        path: PathBuf,
    },

    /// Registry CSV file required by the operation does not exist
    #[error("Registry file does not exist: {}", .path.display())]
    MissingRegistry {
        /// Expected location of `registry.csv`
        path: PathBuf,
    },

    /// Registry file exists but cannot be interpreted
    #[error("Malformed registry {}: {reason}", .path.display())]
    MalformedRegistry {
        /// Registry file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Parameter set shape disagrees with an existing registry header
    #[error("Expected fields that exist in the registry ({expected:?}) do not match observed fields ({observed:?})")]
    SchemaMismatch {
        /// Columns recorded in the registry header
        expected: Vec<String>,
        /// Columns derived from the parameter set being catalogued
        observed: Vec<String>,
    },

    /// Field requested by a migration already exists in the registry
    #[error("Field '{field}' already exists in registry {}", .path.display())]
    DuplicateField {
        /// Field name
        field: String,
        /// Registry file
        path: PathBuf,
    },

    /// Field name or value cannot be stored in the comma-separated registry
    #[error("Invalid field '{name}': {reason}")]
    InvalidField {
        /// Field name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Parameter set constructor rejected its arguments
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Sample id not present in the registry
    #[error("Sample {sample} not found in registry {}", .path.display())]
    UnknownSample {
        /// Requested sample id
        sample: u64,
        /// Registry file
        path: PathBuf,
    },

    /// Environment configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl serde::ser::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self::InvalidParameter(format!("Failed to serialize parameters: {msg}"))
    }
}
