//! Error types for blobworld_core.
//!
//! Frame updates and collision queries never fail; the fallible surface is
//! configuration loading and snapshot export.

use thiserror::Error;

/// Main error type for blobworld_core operations.
#[derive(Error, Debug)]
pub enum SimError {
    /// File system errors
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is out of range
    #[error("Invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<SimError>,
    },
}

/// Result type alias for blobworld_core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn invalid_config<S: Into<String>>(field: &'static str, reason: S) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::invalid_config("fruit.target", "too large");
        assert_eq!(err.to_string(), "Invalid config `fruit.target`: too large");
    }

    #[test]
    fn test_error_context() {
        let err = SimError::invalid_config("arena.aspect", "must be positive")
            .with_context("loading config.toml");
        assert!(err.to_string().starts_with("loading config.toml"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SimError = io_err.into();
        assert!(matches!(err, SimError::Io(_)));
    }
}
