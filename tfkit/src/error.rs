//! Error types for tfkit

/// Error type for tfkit operations
#[derive(Debug, thiserror::Error)]
pub enum TfkitError {
    #[error("Resource type not found: {0}")]
    ResourceNotFound(String),

    #[error("Provider not configured")]
    ProviderNotConfigured,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Import failed: {0}")]
    ImportFailed(String),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("{0}")]
    Custom(String),
}

/// Result type alias for tfkit operations
pub type Result<T> = std::result::Result<T, TfkitError>;

impl From<String> for TfkitError {
    fn from(s: String) -> Self {
        TfkitError::Custom(s)
    }
}

impl From<&str> for TfkitError {
    fn from(s: &str) -> Self {
        TfkitError::Custom(s.to_string())
    }
}
