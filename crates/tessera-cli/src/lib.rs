//! # Tessera CLI
//!
//! Demo command-line host for the Tessera identity SDK.
//!
//! The CLI plays the role a mobile application would: it configures an
//! [`tessera_sdk::IdentityService`], opens the login page in the system
//! browser, and receives the redirect on a temporary loopback HTTP server
//! instead of a custom URL scheme.
//!
//! Architecture:
//! - Clap-based argument parsing with derive macros
//! - Handler-based command processing
//! - Shared configuration and error handling
//! - A top-level "current service" registry; the SDK itself always takes
//!   explicit instances

pub mod callback;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod progress;
pub mod registry;

pub use cli::*;
pub use error::*;
