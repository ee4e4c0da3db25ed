//! Error types for sqlrow

use thiserror::Error;

/// Result type alias for sqlrow operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for descriptor parsing, configuration, decoding and execution.
///
/// The connection driver and the record facade never return these directly:
/// they render them into the driver's last-error string instead.
#[derive(Debug, Error)]
pub enum OrmError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement preparation or execution error
    #[error("Query error: {0}")]
    Query(#[from] rusqlite::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error (identifiers, descriptors, refused statements)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration loading error
    #[error("Config error: {0}")]
    Config(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

impl From<toml::de::Error> for OrmError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
