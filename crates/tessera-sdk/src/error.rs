//! Error types for identity operations
//!
//! The taxonomy separates user-visible authentication outcomes (canceled,
//! start failed) from data problems (invalid payloads), transport failures
//! and the unauthorized status that forces a logout.

use thiserror::Error;

/// Result type for identity operations
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity SDK errors
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The data which was received is invalid
    #[error("Invalid data received from the identity service")]
    InvalidData,

    /// The authentication process was canceled by the user
    #[error("Authentication canceled")]
    AuthenticationCanceled,

    /// The authentication process failed to start
    #[error("Authentication failed to start: {reason}")]
    AuthenticationStartFailed { reason: String },

    /// A session transition was attempted from the wrong state
    #[error("Invalid session state: expected {expected}, found {actual}")]
    WrongState {
        expected: &'static str,
        actual: &'static str,
    },

    /// An operation that requires a session was called while logged out
    #[error("User is not logged in")]
    NotLoggedIn,

    /// The server rejected the session token (HTTP 401/403)
    #[error("Session token rejected with HTTP status {status}")]
    Unauthorized { status: u16 },

    /// Network error while talking to the identity service
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credential store failure
    #[error("Credential store error: {message}")]
    Storage { message: String },

    /// A URL required by the flow could not be constructed
    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },
}

impl IdentityError {
    /// True for HTTP 401/403 responses, the trigger for forced logout
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub(crate) fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            message: message.into(),
        }
    }
}

impl From<keyring::Error> for IdentityError {
    fn from(err: keyring::Error) -> Self {
        Self::Storage {
            message: err.to_string(),
        }
    }
}
