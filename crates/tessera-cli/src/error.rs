//! Error types for the Tessera CLI

use color_eyre::eyre::Report;
use thiserror::Error;

/// CLI error type with minimal variants
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file issues
    #[error("Configuration error")]
    Config(#[from] tessera_common::ConfigurationError),

    /// Identity SDK errors
    #[error(transparent)]
    Identity(#[from] tessera_sdk::IdentityError),

    /// Loopback callback server failures
    #[error("Callback server error: {0}")]
    CallbackServer(String),

    /// The browser redirect never arrived
    #[error("Timed out waiting for the browser redirect")]
    CallbackTimeout,

    /// Filesystem issues
    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// Everything else (using color-eyre's Report for rich errors)
    #[error(transparent)]
    Internal(#[from] Report),
}

impl CliError {
    /// Wrap an ad-hoc message as an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(Report::msg(message.into()))
    }

    /// An invalid user-supplied argument
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::Internal(Report::msg(format!("Invalid argument: {}", message.into())))
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
