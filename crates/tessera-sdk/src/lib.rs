//! # Tessera SDK
//!
//! Embeddable identity and login SDK. It drives a browser-based login flow
//! against an identity provider, persists the resulting session token in
//! the platform credential store and exposes the logged-in account state.
//!
//! The host application owns the UI: it supplies an [`ExternalUserAgent`]
//! (the surface the login page opens in), feeds redirect callback URLs into
//! [`IdentityService::handle_callback`], and reacts to [`IdentityEvent`]s.
//!
//! ```rust,no_run
//! use tessera_sdk::{IdentityConfig, IdentityService};
//! use url::Url;
//!
//! # async fn example() -> tessera_sdk::IdentityResult<()> {
//! let config = IdentityConfig::new(
//!     Url::parse("https://id.example.test").unwrap(),
//!     Url::parse("myapp://callback").unwrap(),
//! );
//! let mut service = IdentityService::builder(config).build().await?;
//!
//! service.login(Some("a@b.com"));
//! // ... later, the OS hands the application the redirect URL:
//! service
//!     .handle_callback(&Url::parse("myapp://callback?token=XYZ").unwrap())
//!     .await;
//! assert!(service.is_logged_in());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod service;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use auth::{
    AuthenticationOutcome, AuthenticationRequest, AuthenticationSession, ExternalUserAgent,
    WebBrowserAgent,
};
pub use client::AccountClient;
pub use config::IdentityConfig;
pub use error::{IdentityError, IdentityResult};
pub use events::IdentityEvent;
pub use service::{IdentityService, IdentityServiceBuilder};
pub use store::{CredentialStore, KeyringStore, MemoryStore};
pub use types::{Account, Gender, SessionToken};
