//! Error types for ouroboros-unit
//!
//! Assertion failures are test outcomes, not errors, and never surface here.
//! These variants cover the fallible edges: writing to the output sink,
//! serializing a report, and reading configuration.

use thiserror::Error;

/// Result type alias for ouroboros-unit operations
pub type Result<T> = std::result::Result<T, UnitError>;

/// Unified error type for the framework's fallible operations
#[derive(Error, Debug)]
pub enum UnitError {
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for UnitError {
    fn from(err: serde_json::Error) -> Self {
        UnitError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for UnitError {
    fn from(err: serde_yaml::Error) -> Self {
        UnitError::Serialization(format!("YAML serialization error: {}", err))
    }
}
