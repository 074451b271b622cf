//! The immutable description of one login attempt

use super::redirect;
use crate::config::IdentityConfig;
use crate::error::IdentityResult;
use tessera_common::TOKEN_QUERY_PARAM;
use url::Url;

/// Immutable value describing a single authentication attempt: the URL to
/// open in the external user-agent, the redirect URL the provider will
/// invoke on completion, and the optional prefilled identifier.
#[derive(Debug, Clone)]
pub struct AuthenticationRequest {
    target_url: Url,
    redirect_url: Url,
    prefill_identifier: Option<String>,
}

impl AuthenticationRequest {
    /// Build the request for one login attempt against the configured
    /// identity provider.
    pub fn new(config: &IdentityConfig, email: Option<&str>) -> IdentityResult<Self> {
        Ok(Self {
            target_url: config.authorize_url(email)?,
            redirect_url: config.redirect_url.clone(),
            prefill_identifier: email.map(str::to_owned),
        })
    }

    /// The complete authentication request URL, to be opened in an external
    /// user-agent.
    pub fn target_url(&self) -> &Url {
        &self.target_url
    }

    /// The redirect URL that hands control back to the application
    pub fn redirect_url(&self) -> &Url {
        &self.redirect_url
    }

    /// The identifier the login form was asked to prefill, if any
    pub fn prefill_identifier(&self) -> Option<&str> {
        self.prefill_identifier.as_deref()
    }

    /// Confirm that a redirect response URL conforms to this request
    pub fn should_handle(&self, url: &Url) -> bool {
        redirect::matches(url, &self.redirect_url)
    }

    /// Extract the session token parameter from a redirect URL that already
    /// passed [`should_handle`](Self::should_handle).
    pub fn token_from(&self, url: &Url) -> Option<String> {
        redirect::query_params(url).remove(TOKEN_QUERY_PARAM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: Option<&str>) -> AuthenticationRequest {
        let config = IdentityConfig::new(
            Url::parse("https://id.example.test").unwrap(),
            Url::parse("myapp://callback").unwrap(),
        );
        AuthenticationRequest::new(&config, email).unwrap()
    }

    #[test]
    fn target_url_prefills_the_email() {
        let request = request(Some("a@b.com"));
        assert!(request
            .target_url()
            .query_pairs()
            .any(|(k, v)| k == "email" && v == "a@b.com"));
        assert_eq!(request.prefill_identifier(), Some("a@b.com"));
        assert_eq!(request.redirect_url().scheme(), "myapp");
    }

    #[test]
    fn handles_only_the_expected_redirect() {
        let request = request(None);
        assert!(request.should_handle(&Url::parse("myapp://callback?token=XYZ").unwrap()));
        assert!(!request.should_handle(&Url::parse("https://other.test/callback?token=XYZ").unwrap()));
    }

    #[test]
    fn extracts_the_token_parameter() {
        let request = request(None);
        let url = Url::parse("myapp://callback?token=XYZ&foo=bar").unwrap();
        assert_eq!(request.token_from(&url).as_deref(), Some("XYZ"));

        let tokenless = Url::parse("myapp://callback?foo=bar").unwrap();
        assert_eq!(request.token_from(&tokenless), None);
    }
}
