//! Command handlers

pub mod account;
pub mod auth;
pub mod config;

use crate::config::CliConfig;
use crate::error::{CliError, Result};
use tessera_sdk::{IdentityConfig, IdentityService};
use url::Url;

/// Build an identity service from the CLI configuration.
///
/// Commands that never present a login attempt pass `None` and get a
/// placeholder redirect; the redirect URL only matters while presenting.
pub(crate) async fn build_service(
    config: &CliConfig,
    redirect_url: Option<Url>,
) -> Result<IdentityService> {
    let redirect_url = match redirect_url {
        Some(url) => url,
        None => Url::parse("http://127.0.0.1/callback")
            .map_err(|e| CliError::internal(format!("Invalid placeholder redirect: {e}")))?,
    };

    let mut identity_config = IdentityConfig::new(config.service_url()?, redirect_url);
    if let Some(website_url) = config.website_url()? {
        identity_config = identity_config.with_website_url(website_url);
    }
    if let Some(access_group) = &config.service.access_group {
        identity_config = identity_config.with_access_group(access_group.clone());
    }

    IdentityService::builder(identity_config)
        .build()
        .await
        .map_err(CliError::Identity)
}
