//! Domain error types
//!
//! This module defines the error hierarchy for the service. Errors are
//! domain-specific and don't expose third-party types to callers.

use thiserror::Error;

/// Main application error type
///
/// This is the primary error type used throughout the crate.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Anonymization errors
    #[error("Anonymization error: {0}")]
    Anonymization(#[from] AnonymizationError),

    /// Structured logger errors (sink setup, sink writes)
    #[error("Logging error: {0}")]
    Logging(String),

    /// Document database errors
    #[error("Database error: {0}")]
    Database(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Anonymization-specific errors
///
/// Raised when the data handed to the anonymizer has a shape it cannot walk,
/// or when a change rule is malformed.
#[derive(Debug, Error, PartialEq)]
pub enum AnonymizationError {
    /// Top-level data is neither a mapping, a sequence nor a table
    #[error("Data of type '{0}' is not supported")]
    UnsupportedData(String),

    /// A top-level sequence held something other than mappings
    #[error("Sequence must only hold mappings, found '{0}'")]
    MixedSequence(String),

    /// A table's rows don't line up with its columns
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// A change rule could not be built
    #[error("Invalid change rule: {0}")]
    InvalidRule(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from INI parse errors raised by the config crate
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(format!("INI parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_anonymization_error_conversion() {
        let anon_err = AnonymizationError::UnsupportedData("string".to_string());
        let app_err: AppError = anon_err.into();
        assert!(matches!(app_err, AppError::Anonymization(_)));
        assert_eq!(
            app_err.to_string(),
            "Anonymization error: Data of type 'string' is not supported"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let app_err: AppError = toml_err.into();
        assert!(matches!(app_err, AppError::Configuration(_)));
        assert!(app_err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_app_error_implements_std_error() {
        let err = AppError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
