//! Error Handling
//!
//! Unified error types for the pipeline application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;
use xunit_core::CoreError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Errors raised by the pipeline crates
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML configuration parse errors
    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Remote stylesheet download errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The wrapped pipeline error, if any.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            AppError::Core(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::config("no tools configured");
        assert_eq!(err.to_string(), "Configuration error: no tools configured");
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: AppError = CoreError::no_test_found("nothing matched").into();
        assert!(matches!(err.as_core(), Some(CoreError::NoTestFound(_))));
        let msg: String = err.into();
        assert_eq!(msg, CoreError::no_test_found("nothing matched").to_string());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse: Result<toml::Value, _> = toml::from_str("tools = [");
        let app_err: AppError = parse.unwrap_err().into();
        assert!(app_err.to_string().starts_with("Invalid configuration file"));
    }
}
