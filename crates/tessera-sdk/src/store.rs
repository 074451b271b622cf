//! Secure persistence of the session token
//!
//! The store is keyed by service identity: the credential row for
//! `(access_group, service URL)` belongs to exactly one identity service,
//! so concurrent services with different identities never share state.

use crate::error::{IdentityError, IdentityResult};
use crate::types::SessionToken;
use async_trait::async_trait;
use tessera_common::DEFAULT_ACCESS_GROUP;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

/// Persists, retrieves and erases the session token for one service
/// identity.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist `token`, replacing any previously stored one
    async fn save(&self, token: &SessionToken) -> IdentityResult<()>;

    /// Retrieve the stored token, if any
    async fn load(&self) -> IdentityResult<Option<SessionToken>>;

    /// Erase the stored token; succeeds when nothing was stored
    async fn erase(&self) -> IdentityResult<()>;
}

/// Platform credential store backed by the OS keychain/keyring.
///
/// The keyring service name is the configured access group (or a default),
/// and the entry user is the service URL, which keeps one row per identity.
pub struct KeyringStore {
    service: String,
    user: String,
}

impl KeyringStore {
    /// Create a store for the given service identity
    pub fn new(service_url: &Url, access_group: Option<&str>) -> Self {
        Self {
            service: access_group.unwrap_or(DEFAULT_ACCESS_GROUP).to_string(),
            user: service_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    fn entry(&self) -> IdentityResult<keyring::Entry> {
        keyring::Entry::new(&self.service, &self.user).map_err(IdentityError::from)
    }
}

#[async_trait]
impl CredentialStore for KeyringStore {
    async fn save(&self, token: &SessionToken) -> IdentityResult<()> {
        debug!("Storing session token in keyring for {}", self.user);
        self.entry()?.set_password(token.as_str())?;
        Ok(())
    }

    async fn load(&self) -> IdentityResult<Option<SessionToken>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(SessionToken::new(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn erase(&self) -> IdentityResult<()> {
        debug!("Erasing session token from keyring for {}", self.user);
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and hosts without a platform keyring
#[derive(Default)]
pub struct MemoryStore {
    token: RwLock<Option<SessionToken>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn save(&self, token: &SessionToken) -> IdentityResult<()> {
        *self.token.write().await = Some(token.clone());
        Ok(())
    }

    async fn load(&self) -> IdentityResult<Option<SessionToken>> {
        Ok(self.token.read().await.clone())
    }

    async fn erase(&self) -> IdentityResult<()> {
        *self.token.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        store.save(&SessionToken::new("XYZ")).await.unwrap();
        assert_eq!(
            store.load().await.unwrap().as_ref().map(SessionToken::as_str),
            Some("XYZ")
        );

        store.erase().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_save_replaces_previous_token() {
        let store = MemoryStore::new();
        store.save(&SessionToken::new("first")).await.unwrap();
        store.save(&SessionToken::new("second")).await.unwrap();
        assert_eq!(
            store.load().await.unwrap().as_ref().map(SessionToken::as_str),
            Some("second")
        );
    }

    #[test]
    fn keyring_store_is_keyed_by_identity() {
        let url = Url::parse("https://id.example.test/").unwrap();
        let store = KeyringStore::new(&url, None);
        assert_eq!(store.service, "tessera");
        assert_eq!(store.user, "https://id.example.test");

        let grouped = KeyringStore::new(&url, Some("com.example.shared"));
        assert_eq!(grouped.service, "com.example.shared");
    }
}
