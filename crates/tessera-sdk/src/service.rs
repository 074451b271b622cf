//! The identity service façade
//!
//! Owns zero-or-one authentication session, the persisted session token and
//! the cached account, and emits lifecycle events. All public operations
//! are driven from one logical task; asynchronous work is awaited inside
//! the operations rather than spawned.

use crate::auth::{
    AuthenticationOutcome, AuthenticationRequest, AuthenticationSession, ExternalUserAgent,
    WebBrowserAgent,
};
use crate::client::{AccountClient, DEFAULT_TIMEOUT_SECS};
use crate::config::IdentityConfig;
use crate::error::{IdentityError, IdentityResult};
use crate::events::{EventBus, IdentityEvent};
use crate::store::{CredentialStore, KeyringStore};
use crate::types::{Account, SessionToken};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use url::Url;

/// Top-level identity service: login, logout, account state and lifecycle
/// events for one identity provider.
pub struct IdentityService {
    config: IdentityConfig,
    agent: Arc<dyn ExternalUserAgent>,
    store: Arc<dyn CredentialStore>,
    client: AccountClient,
    events: EventBus,
    session: Option<AuthenticationSession>,
    token: Option<SessionToken>,
    account: Option<Account>,
    unauthorized_check: bool,
}

impl IdentityService {
    /// Start building a service (use this instead of a direct constructor)
    pub fn builder(config: IdentityConfig) -> IdentityServiceBuilder {
        IdentityServiceBuilder::new(config)
    }

    // ===== State accessors =====

    /// The service configuration
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// The login status: true once a session token is held. The account may
    /// lag behind while its fetch is still outstanding.
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// The logged-in session token, if any
    pub fn session_token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// The cached account, if it has been fetched
    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    /// The logged-in email address, if known
    pub fn email_address(&self) -> Option<&str> {
        self.account.as_ref()?.email_address.as_deref()
    }

    /// The logged-in display name, if known
    pub fn display_name(&self) -> Option<&str> {
        self.account.as_ref()?.display_name.as_deref()
    }

    /// The logged-in user id, if known
    pub fn user_id(&self) -> Option<&str> {
        self.account.as_ref()?.uid.as_deref()
    }

    /// True while a login attempt is presented in the external user-agent
    pub fn has_pending_login(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(AuthenticationSession::is_presenting)
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<IdentityEvent> {
        self.events.subscribe()
    }

    // ===== Login flow =====

    /// Start a login attempt, optionally prefilling the form with `email`.
    ///
    /// Returns false without any state change when already logged in, when
    /// another attempt is being presented, or when the external user-agent
    /// could not be opened. On success the attempt resolves later through
    /// [`handle_callback`](Self::handle_callback) or
    /// [`cancel_login`](Self::cancel_login).
    pub fn login(&mut self, email: Option<&str>) -> bool {
        if self.is_logged_in() {
            debug!("login refused: already logged in");
            return false;
        }
        if self.has_pending_login() {
            debug!("login refused: an authentication session is already presented");
            return false;
        }

        let request = match AuthenticationRequest::new(&self.config, email) {
            Ok(request) => request,
            Err(e) => {
                warn!("Could not build authentication request: {}", e);
                return false;
            }
        };

        let mut session = AuthenticationSession::new(request, self.agent.clone());
        match session.present() {
            Ok(()) => {
                info!("Login attempt presented in external user-agent");
                self.session = Some(session);
                true
            }
            Err(e) => {
                warn!("Login failed to start: {}", e);
                false
            }
        }
    }

    /// Hand the service a callback URL delivered by the host OS.
    ///
    /// Returns false when no pending attempt consumed the URL (the host
    /// should keep probing its other URL handlers). On consumption the
    /// attempt resolves: the token is persisted, the account fetch is
    /// started and the corresponding lifecycle event is emitted exactly
    /// once.
    pub async fn handle_callback(&mut self, url: &Url) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.resume(url) {
            return false;
        }

        // Clear the active session before acting on the outcome, so event
        // handlers observe the service ready for a new login
        let outcome = self
            .session
            .take()
            .and_then(AuthenticationSession::into_outcome);
        match outcome {
            Some(AuthenticationOutcome::Success { token }) => {
                self.complete_login(token).await;
            }
            Some(AuthenticationOutcome::Cancelled) => {
                self.events.emit(IdentityEvent::LoginCancelled);
            }
            Some(AuthenticationOutcome::Failed(error)) => {
                warn!("Login failed: {}", error);
                self.events.emit(IdentityEvent::LoginFailed {
                    error: Arc::new(error),
                });
            }
            // resume() returned true, so the session is resolved
            None => {}
        }
        true
    }

    /// Cancel the pending login attempt, if any. Emits the cancellation
    /// event and returns true when an attempt was actually cancelled.
    pub fn cancel_login(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.cancel() {
            return false;
        }
        self.session = None;
        info!("Login attempt cancelled");
        self.events.emit(IdentityEvent::LoginCancelled);
        true
    }

    /// Fail the pending login attempt with an error reported by the
    /// user-agent surface. Returns true when an attempt was resolved.
    pub fn fail_login(&mut self, error: IdentityError) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.fail(error) {
            return false;
        }
        if let Some(AuthenticationOutcome::Failed(error)) = self
            .session
            .take()
            .and_then(AuthenticationSession::into_outcome)
        {
            warn!("Login failed: {}", error);
            self.events.emit(IdentityEvent::LoginFailed {
                error: Arc::new(error),
            });
        }
        true
    }

    // ===== Session lifecycle =====

    /// End the current session: erase the stored credential, drop the
    /// cached account and emit the logout event. Returns false when not
    /// logged in.
    pub async fn logout(&mut self) -> bool {
        if !self.is_logged_in() {
            debug!("logout refused: not logged in");
            return false;
        }
        self.end_session(false, false).await;
        true
    }

    /// Re-validate the session after a third party reported the token as
    /// rejected. A confirmed 401/403 from the account webservice forces a
    /// logout with `unauthorized: true`; a successful response refreshes
    /// the account instead; a transport failure is inconclusive and leaves
    /// the session untouched.
    pub async fn report_unauthorization(&mut self) {
        let Some(token) = self.token.clone() else {
            debug!("unauthorized report ignored: not logged in");
            return;
        };
        // A second report while one is in flight must not double-logout
        if self.unauthorized_check {
            debug!("unauthorized report ignored: check already in flight");
            return;
        }
        self.unauthorized_check = true;

        let result = self.client.fetch_account(&token).await;
        self.unauthorized_check = false;

        match result {
            Ok(account) => {
                debug!("Session token still accepted, refreshing account");
                self.replace_account(account);
            }
            Err(error) if error.is_unauthorized() => {
                info!("Session token confirmed unauthorized");
                self.end_session(true, false).await;
            }
            Err(error) => {
                warn!("Unauthorized check inconclusive: {}", error);
            }
        }
    }

    /// Fetch the account with the current token and update the cached copy.
    ///
    /// An unauthorized response is returned as an error for the caller to
    /// feed into [`report_unauthorization`](Self::report_unauthorization);
    /// this method never logs the user out by itself.
    pub async fn fetch_account(&mut self) -> IdentityResult<Account> {
        let Some(token) = self.token.clone() else {
            return Err(IdentityError::NotLoggedIn);
        };
        let account = self.client.fetch_account(&token).await?;
        self.replace_account(account.clone());
        Ok(account)
    }

    // ===== Internals =====

    async fn complete_login(&mut self, token: SessionToken) {
        // Persisting the token is best-effort: the login itself succeeded
        if let Err(e) = self.store.save(&token).await {
            warn!("Failed to persist session token: {}", e);
        }
        self.token = Some(token.clone());
        info!("User logged in");
        self.events.emit(IdentityEvent::UserLoggedIn);

        // Observational: a failed fetch leaves the token valid
        match self.client.fetch_account(&token).await {
            Ok(account) => self.replace_account(account),
            Err(e) => warn!("Account fetch after login failed: {}", e),
        }
    }

    async fn end_session(&mut self, unauthorized: bool, deleted: bool) {
        if let Err(e) = self.store.erase().await {
            warn!("Failed to erase stored credential: {}", e);
        }
        self.token = None;
        self.account = None;
        info!(unauthorized, deleted, "User logged out");
        self.events.emit(IdentityEvent::UserLoggedOut {
            unauthorized,
            deleted,
        });
    }

    fn replace_account(&mut self, account: Account) {
        let previous = self.account.replace(account.clone());
        self.events
            .emit(IdentityEvent::AccountUpdated { account, previous });
    }
}

/// Builder for [`IdentityService`]
///
/// The user-agent defaults to the system web browser and the credential
/// store to the platform keyring; tests and embedders with their own
/// surfaces inject replacements.
pub struct IdentityServiceBuilder {
    config: IdentityConfig,
    agent: Option<Arc<dyn ExternalUserAgent>>,
    store: Option<Arc<dyn CredentialStore>>,
    timeout: Duration,
}

impl IdentityServiceBuilder {
    fn new(config: IdentityConfig) -> Self {
        Self {
            config,
            agent: None,
            store: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Replace the external user-agent
    pub fn user_agent(mut self, agent: Arc<dyn ExternalUserAgent>) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Replace the credential store
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Timeout for account webservice requests
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the service, restoring a previously persisted session token so
    /// a logged-in state survives process restarts.
    pub async fn build(self) -> IdentityResult<IdentityService> {
        let client = AccountClient::new(&self.config, self.timeout)?;
        let agent = self
            .agent
            .unwrap_or_else(|| Arc::new(WebBrowserAgent) as Arc<dyn ExternalUserAgent>);
        let store = self.store.unwrap_or_else(|| {
            Arc::new(KeyringStore::new(
                &self.config.webservice_url,
                self.config.access_group.as_deref(),
            )) as Arc<dyn CredentialStore>
        });

        let token = match store.load().await {
            Ok(token) => {
                if token.is_some() {
                    debug!("Restored persisted session token");
                }
                token
            }
            Err(e) => {
                warn!("Could not read the credential store: {}", e);
                None
            }
        };

        Ok(IdentityService {
            config: self.config,
            agent,
            store,
            client,
            events: EventBus::new(),
            session: None,
            token,
            account: None,
            unauthorized_check: false,
        })
    }
}
