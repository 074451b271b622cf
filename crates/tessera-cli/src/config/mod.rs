//! Configuration management for the Tessera CLI

use crate::error::{CliError, Result};
use etcetera::{choose_base_strategy, BaseStrategy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tessera_common::ConfigurationError;
use tracing::{debug, info};
use url::Url;

/// CLI configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Identity provider configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Login flow configuration
    #[serde(default)]
    pub login: LoginConfig,
}

/// Identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the identity webservice
    #[serde(default = "default_service_url")]
    pub url: String,

    /// Base URL of the website hosting the login pages, when it differs
    /// from the webservice URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,

    /// Credential-store namespace shared with sibling applications
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_group: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: default_service_url(),
            website_url: None,
            access_group: None,
        }
    }
}

fn default_service_url() -> String {
    "https://id.tessera.network".to_string()
}

/// Login flow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginConfig {
    /// Seconds to wait for the browser redirect before giving up
    #[serde(default = "default_callback_timeout")]
    pub callback_timeout_seconds: u64,

    /// Fixed callback port; when unset, an available port is picked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_port: Option<u16>,
}

fn default_callback_timeout() -> u64 {
    300
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            callback_timeout_seconds: default_callback_timeout(),
            callback_port: None,
        }
    }
}

impl CliConfig {
    /// Load configuration from the default location
    pub async fn load_default() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path).await
    }

    /// Load configuration from a specific path
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());

        if !path.exists() {
            debug!(
                "Configuration file not found, using defaults: {}",
                path.display()
            );
            // Return default config without creating the file
            return Ok(Self::default());
        }

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ConfigurationError::ReadFailed {
                    path: path.display().to_string(),
                    source: e,
                })?;

        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigurationError::ParseFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        debug!("Successfully loaded configuration");
        Ok(config)
    }

    /// Save configuration to a specific path
    pub async fn save_to_path(&self, path: &Path) -> Result<()> {
        debug!("Saving configuration to: {}", path.display());

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(CliError::Io)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::internal(format!("Failed to serialize config: {e}")))?;

        tokio::fs::write(path, content).await.map_err(CliError::Io)?;

        info!("Configuration saved successfully");
        Ok(())
    }

    /// The configuration directory (`~/.config/tessera` on Linux)
    pub fn config_dir() -> Result<PathBuf> {
        let strategy = choose_base_strategy()
            .map_err(|e| CliError::internal(format!("Failed to determine base directories: {e}")))?;
        Ok(strategy.config_dir().join("tessera"))
    }

    /// The default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// The service URL as a parsed URL
    pub fn service_url(&self) -> Result<Url> {
        parse_url("service.url", &self.service.url)
    }

    /// The website URL as a parsed URL, if configured
    pub fn website_url(&self) -> Result<Option<Url>> {
        self.service
            .website_url
            .as_deref()
            .map(|raw| parse_url("service.website_url", raw))
            .transpose()
    }

    /// Get configuration value by key
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "service.url" | "service-url" => Ok(self.service.url.clone()),
            "service.website_url" | "website-url" => {
                Ok(self.service.website_url.clone().unwrap_or_default())
            }
            "service.access_group" | "access-group" => {
                Ok(self.service.access_group.clone().unwrap_or_default())
            }
            "login.callback_timeout_seconds" | "callback-timeout" => {
                Ok(self.login.callback_timeout_seconds.to_string())
            }
            "login.callback_port" | "callback-port" => Ok(self
                .login
                .callback_port
                .map(|port| port.to_string())
                .unwrap_or_default()),
            _ => Err(CliError::invalid_argument(format!(
                "Unknown configuration key: {key}"
            ))),
        }
    }

    /// Set configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "service.url" | "service-url" => {
                parse_url("service.url", value)?;
                self.service.url = value.to_string();
            }
            "service.website_url" | "website-url" => {
                parse_url("service.website_url", value)?;
                self.service.website_url = Some(value.to_string());
            }
            "service.access_group" | "access-group" => {
                self.service.access_group = Some(value.to_string());
            }
            "login.callback_timeout_seconds" | "callback-timeout" => {
                self.login.callback_timeout_seconds = value.parse().map_err(|_| {
                    CliError::invalid_argument("callback-timeout must be a number of seconds")
                })?;
            }
            "login.callback_port" | "callback-port" => {
                self.login.callback_port = Some(value.parse().map_err(|_| {
                    CliError::invalid_argument("callback-port must be a port number")
                })?);
            }
            _ => {
                return Err(CliError::invalid_argument(format!(
                    "Unknown configuration key: {key}"
                )))
            }
        }
        Ok(())
    }
}

fn parse_url(key: &str, raw: &str) -> Result<Url> {
    Url::parse(raw)
        .map_err(|e| {
            ConfigurationError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }
            .into()
        })
}
