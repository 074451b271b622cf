//! Browser-based authentication flow
//!
//! This module provides the pieces of one login attempt:
//! - the immutable request describing what to open and where the provider
//!   will redirect back,
//! - redirect URL matching and token extraction,
//! - the session state machine enforcing exactly-once resolution,
//! - the external user-agent seam the host plugs its UI surface into.

pub mod agent;
pub mod redirect;
pub mod request;
pub mod session;

// Re-export commonly used types
pub use agent::{ExternalUserAgent, WebBrowserAgent};
pub use request::AuthenticationRequest;
pub use session::{AuthenticationOutcome, AuthenticationSession};
