//! Domain error types
//!
//! This module defines the error hierarchy for bcats.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main bcats error type
///
/// This is the primary error type used throughout the application.
/// Only [`AtsError::RemoteService`] and [`AtsError::Shape`] are raised by the
/// fetch and aggregation core; the rest come from the surrounding plumbing.
#[derive(Debug, Error)]
pub enum AtsError {
    /// The record source answered with an error object instead of a result set
    #[error("Remote service error: {code}\t{message}")]
    RemoteService { code: String, message: String },

    /// A fetched or joined structure lacks an expected field
    #[error("Shape error: {0}")]
    Shape(String),

    /// Two records share the same index key
    #[error("Duplicate index key: {0}")]
    DuplicateKey(String),

    /// Pagination followed more cursors than allowed
    #[error("Pagination exceeded the limit of {0} pages")]
    PageLimitExceeded(usize),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// The source answered with something that is not a JSON document
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl AtsError {
    /// Builds a remote service error from the code and message reported by the source
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        AtsError::RemoteService {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Process exit code used by the CLI for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AtsError::Configuration(_) | AtsError::Validation(_) => 2,
            AtsError::RemoteService { .. }
            | AtsError::Shape(_)
            | AtsError::DuplicateKey(_)
            | AtsError::PageLimitExceeded(_)
            | AtsError::InvalidResponse(_) => 3,
            AtsError::Connection(_) => 4,
            AtsError::Serialization(_) | AtsError::Io(_) => 5,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for AtsError {
    fn from(err: std::io::Error) -> Self {
        AtsError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AtsError {
    fn from(err: serde_json::Error) -> Self {
        AtsError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AtsError {
    fn from(err: toml::de::Error) -> Self {
        AtsError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for AtsError {
    fn from(err: csv::Error) -> Self {
        AtsError::Serialization(format!("CSV error: {err}"))
    }
}
