//! HTTP client for the account webservice
//!
//! A thin bearer-authenticated client around the account endpoint. The
//! unauthorized statuses (401/403) are surfaced as a dedicated error so the
//! service can distinguish a revoked token from a flaky network.

use crate::config::IdentityConfig;
use crate::error::{IdentityError, IdentityResult};
use crate::types::{Account, SessionToken};
use reqwest::StatusCode;
use std::time::Duration;
use tessera_common::ACCOUNT_ENDPOINT_PATH;
use tracing::debug;
use url::Url;

/// Default timeout for account requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the account endpoint of the identity webservice
#[derive(Debug, Clone)]
pub struct AccountClient {
    http_client: reqwest::Client,
    account_url: Url,
}

impl AccountClient {
    /// Create a client for the configured webservice
    pub fn new(config: &IdentityConfig, timeout: Duration) -> IdentityResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(IdentityError::Http)?;

        let account_url = config
            .webservice_url
            .join(ACCOUNT_ENDPOINT_PATH)
            .map_err(|e| IdentityError::invalid_url(format!("account endpoint URL: {e}")))?;

        Ok(Self {
            http_client,
            account_url,
        })
    }

    /// Fetch the account document for `token`.
    ///
    /// * 2xx with a well-formed body → the account
    /// * 401/403 → [`IdentityError::Unauthorized`]
    /// * any other error status or transport failure → [`IdentityError::Http`]
    pub async fn fetch_account(&self, token: &SessionToken) -> IdentityResult<Account> {
        debug!("Fetching account from {}", self.account_url);

        let response = self
            .http_client
            .get(self.account_url.clone())
            .bearer_auth(token.as_str())
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                response.json::<Account>().await.map_err(|e| {
                    debug!("Malformed account payload: {}", e);
                    IdentityError::InvalidData
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(IdentityError::Unauthorized {
                status: response.status().as_u16(),
            }),
            status => {
                debug!("Account request failed with HTTP status {}", status);
                match response.error_for_status() {
                    Err(e) => Err(IdentityError::Http(e)),
                    Ok(_) => Err(IdentityError::InvalidData),
                }
            }
        }
    }
}
