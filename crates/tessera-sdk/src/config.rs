//! Identity service configuration
//!
//! The configuration is an explicit value handed to the service at
//! construction time. It is immutable afterwards: a host application that
//! needs to talk to a different identity provider builds a new service.

use crate::error::{IdentityError, IdentityResult};
use tessera_common::{EMAIL_QUERY_PARAM, LOGIN_PAGE_PATH, REDIRECT_QUERY_PARAM};
use url::Url;

/// Configuration for an [`IdentityService`](crate::IdentityService)
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Base URL of the account webservice
    pub webservice_url: Url,
    /// Base URL of the user-facing website hosting the login pages
    pub website_url: Url,
    /// The redirect URL the login page invokes on completion. Its scheme is
    /// whatever the host registered with the OS (a custom app scheme on
    /// mobile, a loopback `http` URL for command-line hosts).
    pub redirect_url: Url,
    /// Optional credential-store namespace, so several host applications can
    /// keep separate tokens for the same service URL
    pub access_group: Option<String>,
}

impl IdentityConfig {
    /// Configuration for a provider that serves both the login pages and the
    /// account webservice from a single base URL.
    pub fn new(service_url: Url, redirect_url: Url) -> Self {
        Self {
            webservice_url: service_url.clone(),
            website_url: service_url,
            redirect_url,
            access_group: None,
        }
    }

    /// Use a separate website URL for the login pages
    pub fn with_website_url(mut self, website_url: Url) -> Self {
        self.website_url = website_url;
        self
    }

    /// Namespace the stored credential under an access group
    pub fn with_access_group(mut self, access_group: impl Into<String>) -> Self {
        self.access_group = Some(access_group.into());
        self
    }

    /// Build the URL to open in the external user-agent for one login
    /// attempt: the website login page, told where to redirect and which
    /// email address to prefill.
    pub fn authorize_url(&self, email: Option<&str>) -> IdentityResult<Url> {
        let mut url = self
            .website_url
            .join(LOGIN_PAGE_PATH)
            .map_err(|e| IdentityError::invalid_url(format!("login page URL: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair(REDIRECT_QUERY_PARAM, self.redirect_url.as_str());
            if let Some(email) = email {
                query.append_pair(EMAIL_QUERY_PARAM, email);
            }
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> IdentityConfig {
        IdentityConfig::new(
            Url::parse("https://id.example.test").unwrap(),
            Url::parse("myapp://callback").unwrap(),
        )
    }

    #[test]
    fn authorize_url_carries_redirect_and_email() {
        let url = config().authorize_url(Some("a@b.com")).unwrap();

        assert!(url.as_str().starts_with("https://id.example.test/login?"));
        assert!(url
            .query_pairs()
            .any(|(k, v)| k == "redirect" && v == "myapp://callback"));
        assert!(url.query_pairs().any(|(k, v)| k == "email" && v == "a@b.com"));
    }

    #[test]
    fn authorize_url_omits_email_when_not_prefilled() {
        let url = config().authorize_url(None).unwrap();
        assert!(!url.query_pairs().any(|(k, _)| k == "email"));
    }

    #[test]
    fn website_url_override_moves_the_login_page() {
        let config = config().with_website_url(Url::parse("https://www.example.test").unwrap());
        let url = config.authorize_url(None).unwrap();
        assert!(url.as_str().starts_with("https://www.example.test/login"));
    }
}
