//! Shared plumbing for the Tessera workspace: identity constants, the
//! configuration error type and logging initialization.

pub mod error;
pub mod identity_constants;
pub mod logging;

pub use error::ConfigurationError;
pub use identity_constants::*;
