//! The external user-agent collaborator
//!
//! An external user-agent is an OS-provided UI surface (typically a web
//! browser) used to host the login page outside the application's own
//! process trust boundary. The session only needs two operations from it;
//! everything else (receiving the callback URL, the "user closed" event) is
//! delivered to the session by the host.

use tracing::warn;
use url::Url;

/// Minimal surface the authentication session requires from the UI layer
pub trait ExternalUserAgent: Send + Sync {
    /// Open `url` in the user-agent. Returns `false` when the surface could
    /// not be presented, in which case the login attempt fails to start.
    fn open(&self, url: &Url) -> bool;

    /// Dismiss the user-agent once the flow is resolved. Implementations
    /// for surfaces the application cannot close may ignore this.
    fn dismiss(&self);
}

/// Production user-agent that opens the system web browser
#[derive(Debug, Default)]
pub struct WebBrowserAgent;

impl ExternalUserAgent for WebBrowserAgent {
    fn open(&self, url: &Url) -> bool {
        match webbrowser::open(url.as_str()) {
            Ok(_) => true,
            Err(e) => {
                warn!("Failed to open browser: {}", e);
                false
            }
        }
    }

    // The system browser is not ours to close; the login page is expected
    // to tell the user the flow is complete.
    fn dismiss(&self) {}
}
