//! Shared error types

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A configuration file exists but could not be read
    #[error("Failed to read configuration from {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed
    #[error("Failed to parse configuration from {path}: {message}")]
    ParseFailed { path: String, message: String },

    /// A configuration value is missing or malformed
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}
