//! Core Error Types
//!
//! Defines the foundational error types shared by every crate in the xUnit
//! pipeline workspace. Only thiserror + serde_json + std are involved so the
//! converters and gates crates can depend on this without pulling anything heavy.
//!
//! The application crate extends these with TOML, HTTP and history-store
//! failures in its own `AppError`.

use thiserror::Error;

/// Core error type for the xUnit pipeline workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

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

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// A tool pattern matched no report file
    #[error("No test found: {0}")]
    NoTestFound(String),

    /// Reports were matched but some predate the run
    #[error("Outdated reports: {0}")]
    OutdatedReports(String),

    /// A report could not be converted to the canonical format
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// A custom stylesheet could not be located
    #[error("Stylesheet not found: {0}")]
    StylesheetNotFound(String),

    /// Run-level state could not be updated (e.g. merging into an existing result)
    #[error("Illegal state: {0}")]
    State(String),

    /// Failure while talking to an execution node
    #[error("Remote error: {0}")]
    Remote(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
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

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a no-test-found error
    pub fn no_test_found(msg: impl Into<String>) -> Self {
        Self::NoTestFound(msg.into())
    }

    /// Create an outdated-reports error
    pub fn outdated_reports(msg: impl Into<String>) -> Self {
        Self::OutdatedReports(msg.into())
    }

    /// Create a conversion error
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }

    /// Create a stylesheet-not-found error
    pub fn stylesheet_not_found(msg: impl Into<String>) -> Self {
        Self::StylesheetNotFound(msg.into())
    }

    /// Create an illegal state error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Create a remote error
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
