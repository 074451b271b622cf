//! The authentication session state machine
//!
//! A session owns at most one in-flight [`AuthenticationRequest`] and
//! mediates between the external user-agent and the resolution of the
//! attempt. States: `Idle` (created, nothing shown) → `Presenting`
//! (user-agent open, awaiting the callback) → `Resolved` (terminal).
//!
//! The first terminal transition wins: once resolved, `resume`, `cancel`
//! and `fail` are no-ops, so a callback URL racing a user cancellation can
//! never double-resolve the attempt or dismiss the user-agent twice.

use super::agent::ExternalUserAgent;
use super::request::AuthenticationRequest;
use crate::error::{IdentityError, IdentityResult};
use crate::types::SessionToken;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Terminal result of an authentication session
#[derive(Debug)]
pub enum AuthenticationOutcome {
    /// The provider redirected back with a session token
    Success { token: SessionToken },
    /// The user aborted the attempt
    Cancelled,
    /// The attempt failed before a token was obtained
    Failed(IdentityError),
}

enum SessionState {
    Idle,
    Presenting,
    Resolved(AuthenticationOutcome),
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Presenting => "presenting",
            Self::Resolved(_) => "resolved",
        }
    }
}

/// A single authentication attempt against the identity provider
pub struct AuthenticationSession {
    request: AuthenticationRequest,
    agent: Arc<dyn ExternalUserAgent>,
    state: SessionState,
}

impl AuthenticationSession {
    /// Create an idle session for `request`
    pub fn new(request: AuthenticationRequest, agent: Arc<dyn ExternalUserAgent>) -> Self {
        Self {
            request,
            agent,
            state: SessionState::Idle,
        }
    }

    /// The request this session serves
    pub fn request(&self) -> &AuthenticationRequest {
        &self.request
    }

    /// True while the user-agent is open and the callback is awaited
    pub fn is_presenting(&self) -> bool {
        matches!(self.state, SessionState::Presenting)
    }

    /// True once the session reached a terminal state
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, SessionState::Resolved(_))
    }

    /// Present the request in the external user-agent.
    ///
    /// Valid only from `Idle`. When the user-agent refuses to open, the
    /// session stays `Idle` and the start failure is returned to the caller.
    pub fn present(&mut self) -> IdentityResult<()> {
        if !matches!(self.state, SessionState::Idle) {
            return Err(IdentityError::WrongState {
                expected: "idle",
                actual: self.state.name(),
            });
        }

        debug!("Presenting authentication request in external user-agent");
        if !self.agent.open(self.request.target_url()) {
            return Err(IdentityError::AuthenticationStartFailed {
                reason: "external user-agent could not be opened".to_string(),
            });
        }

        self.state = SessionState::Presenting;
        Ok(())
    }

    /// Hand the session a callback URL delivered by the host.
    ///
    /// Returns `true` iff the URL matched the expected redirect and was
    /// consumed; `false` leaves the session `Presenting` so the host can
    /// keep probing other handlers. A matching URL without a token
    /// parameter is consumed as a failure (the provider sent invalid data).
    pub fn resume(&mut self, url: &Url) -> bool {
        if !self.is_presenting() {
            return false;
        }
        if !self.request.should_handle(url) {
            debug!("Callback URL does not match the expected redirect, ignoring");
            return false;
        }

        let outcome = match self.request.token_from(url) {
            Some(token) => AuthenticationOutcome::Success {
                token: SessionToken::new(token),
            },
            None => AuthenticationOutcome::Failed(IdentityError::InvalidData),
        };
        self.resolve(outcome);
        true
    }

    /// Cancel the attempt. Returns `true` iff a transition was committed;
    /// calling on an idle or already-resolved session is a safe no-op.
    pub fn cancel(&mut self) -> bool {
        if !self.is_presenting() {
            return false;
        }
        self.resolve(AuthenticationOutcome::Cancelled);
        true
    }

    /// Fail the attempt with a non-token error reported by the user-agent.
    /// Returns `true` iff a transition was committed.
    pub fn fail(&mut self, error: IdentityError) -> bool {
        if !self.is_presenting() {
            return false;
        }
        self.resolve(AuthenticationOutcome::Failed(error));
        true
    }

    /// Consume the session and return its terminal outcome, if it reached
    /// one.
    pub fn into_outcome(self) -> Option<AuthenticationOutcome> {
        match self.state {
            SessionState::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    fn resolve(&mut self, outcome: AuthenticationOutcome) {
        debug!("Authentication session resolved: {:?}", outcome);
        self.state = SessionState::Resolved(outcome);
        self.agent.dismiss();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdentityConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records open/dismiss calls; `refuse_open` makes presenting fail.
    #[derive(Default)]
    struct RecordingAgent {
        refuse_open: bool,
        opened: AtomicUsize,
        dismissed: AtomicUsize,
    }

    impl ExternalUserAgent for RecordingAgent {
        fn open(&self, _url: &Url) -> bool {
            if self.refuse_open {
                return false;
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn dismiss(&self) {
            self.dismissed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn session_with(agent: Arc<RecordingAgent>) -> AuthenticationSession {
        let config = IdentityConfig::new(
            Url::parse("https://id.example.test").unwrap(),
            Url::parse("myapp://callback").unwrap(),
        );
        let request = AuthenticationRequest::new(&config, None).unwrap();
        AuthenticationSession::new(request, agent)
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn present_transitions_to_presenting() {
        let agent = Arc::new(RecordingAgent::default());
        let mut session = session_with(agent.clone());

        session.present().unwrap();
        assert!(session.is_presenting());
        assert_eq!(agent.opened.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn present_twice_is_rejected() {
        let mut session = session_with(Arc::new(RecordingAgent::default()));
        session.present().unwrap();

        let err = session.present().unwrap_err();
        assert!(matches!(
            err,
            IdentityError::WrongState { expected: "idle", actual: "presenting" }
        ));
    }

    #[test]
    fn open_failure_keeps_the_session_idle() {
        let agent = Arc::new(RecordingAgent {
            refuse_open: true,
            ..Default::default()
        });
        let mut session = session_with(agent.clone());

        let err = session.present().unwrap_err();
        assert!(matches!(err, IdentityError::AuthenticationStartFailed { .. }));
        assert!(!session.is_presenting());
        assert!(!session.is_resolved());
        assert_eq!(agent.dismissed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn resume_with_matching_url_succeeds_and_dismisses_once() {
        let agent = Arc::new(RecordingAgent::default());
        let mut session = session_with(agent.clone());
        session.present().unwrap();

        assert!(session.resume(&url("myapp://callback?token=XYZ")));
        assert!(session.is_resolved());
        assert_eq!(agent.dismissed.load(Ordering::SeqCst), 1);

        match session.into_outcome() {
            Some(AuthenticationOutcome::Success { token }) => {
                assert_eq!(token.as_str(), "XYZ");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn resume_with_wrong_scheme_keeps_presenting() {
        let mut session = session_with(Arc::new(RecordingAgent::default()));
        session.present().unwrap();

        assert!(!session.resume(&url("https://other.test/callback?token=XYZ")));
        assert!(session.is_presenting());
    }

    #[test]
    fn resume_without_token_is_consumed_as_invalid_data() {
        let mut session = session_with(Arc::new(RecordingAgent::default()));
        session.present().unwrap();

        assert!(session.resume(&url("myapp://callback?status=ok")));
        match session.into_outcome() {
            Some(AuthenticationOutcome::Failed(IdentityError::InvalidData)) => {}
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn resume_before_present_is_ignored() {
        let mut session = session_with(Arc::new(RecordingAgent::default()));
        assert!(!session.resume(&url("myapp://callback?token=XYZ")));
    }

    #[test]
    fn first_terminal_transition_wins() {
        let agent = Arc::new(RecordingAgent::default());
        let mut session = session_with(agent.clone());
        session.present().unwrap();

        assert!(session.resume(&url("myapp://callback?token=XYZ")));
        // Late cancellation, late callback and late failure are all no-ops
        assert!(!session.cancel());
        assert!(!session.resume(&url("myapp://callback?token=OTHER")));
        assert!(!session.fail(IdentityError::InvalidData));
        assert_eq!(agent.dismissed.load(Ordering::SeqCst), 1);

        match session.into_outcome() {
            Some(AuthenticationOutcome::Success { token }) => {
                assert_eq!(token.as_str(), "XYZ");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn cancel_while_presenting_resolves_cancelled() {
        let agent = Arc::new(RecordingAgent::default());
        let mut session = session_with(agent.clone());
        session.present().unwrap();

        assert!(session.cancel());
        assert!(!session.cancel());
        assert_eq!(agent.dismissed.load(Ordering::SeqCst), 1);
        assert!(matches!(
            session.into_outcome(),
            Some(AuthenticationOutcome::Cancelled)
        ));
    }

    #[test]
    fn cancel_while_idle_is_a_no_op() {
        let mut session = session_with(Arc::new(RecordingAgent::default()));
        assert!(!session.cancel());
        assert!(!session.is_resolved());
    }

    #[test]
    fn fail_while_presenting_resolves_failed() {
        let mut session = session_with(Arc::new(RecordingAgent::default()));
        session.present().unwrap();

        assert!(session.fail(IdentityError::AuthenticationStartFailed {
            reason: "browser crashed".to_string(),
        }));
        assert!(matches!(
            session.into_outcome(),
            Some(AuthenticationOutcome::Failed(_))
        ));
    }
}
