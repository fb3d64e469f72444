//! Configuration for bridge-webhook.

use crate::webhook::{VerifyOptions, WebhookPublicKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Production API base URL.
pub const PRODUCTION_API_BASE_URL: &str = "https://api.bridge.xyz/v0";

/// Sandbox API base URL.
pub const SANDBOX_API_BASE_URL: &str = "https://api.sandbox.bridge.xyz/v0";

/// Provider environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeEnvironment {
    /// Live environment.
    #[default]
    Production,
    /// Sandbox environment.
    Sandbox,
}

impl BridgeEnvironment {
    /// Default API base URL for this environment.
    #[must_use]
    pub fn api_base_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_API_BASE_URL,
            Self::Sandbox => SANDBOX_API_BASE_URL,
        }
    }
}

/// Top-level configuration, loaded once at startup.
#[derive(Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Provider environment.
    #[serde(default)]
    pub environment: BridgeEnvironment,

    /// Override for the API base URL.
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// API key. Never printed by `Debug`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Webhook verification settings.
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Webhook verification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Inline PEM public key. Takes precedence over `public_key_path`.
    #[serde(default)]
    pub public_key: Option<String>,

    /// Path to a PEM public key file.
    #[serde(default)]
    pub public_key_path: Option<PathBuf>,

    /// Freshness window in milliseconds.
    #[serde(default = "default_max_age_ms")]
    pub max_age_ms: u64,

    /// Skip the freshness check. Fixture replay only.
    #[serde(default)]
    pub allow_replay: bool,

    /// Allowed clock skew for future timestamps in milliseconds.
    /// `None` accepts any future timestamp.
    #[serde(default = "default_max_future_skew_ms")]
    pub max_future_skew_ms: Option<u64>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            environment: BridgeEnvironment::default(),
            api_base_url: None,
            api_key: None,
            webhook: WebhookConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            public_key: None,
            public_key_path: None,
            max_age_ms: default_max_age_ms(),
            allow_replay: false,
            max_future_skew_ms: default_max_future_skew_ms(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_max_age_ms() -> u64 {
    600_000 // 10 minutes
}

#[allow(clippy::unnecessary_wraps)]
const fn default_max_future_skew_ms() -> Option<u64> {
    Some(300_000) // 5 minutes
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("environment", &self.environment)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("webhook", &self.webhook)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Platform default location of the configuration file, if one can be
    /// determined.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("xyz", "bridge", "bridge-webhook")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Effective API base URL.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.api_base_url())
    }
}

impl WebhookConfig {
    /// Verification options described by this configuration.
    #[must_use]
    pub fn options(&self) -> VerifyOptions {
        VerifyOptions {
            max_age: Duration::from_millis(self.max_age_ms),
            allow_replay: self.allow_replay,
            max_future_skew: self.max_future_skew_ms.map(Duration::from_millis),
        }
    }

    /// Load the configured public key.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if no key is configured, or an error
    /// if the key cannot be read or decoded.
    pub fn load_public_key(&self) -> crate::Result<WebhookPublicKey> {
        if let Some(pem) = &self.public_key {
            return Ok(WebhookPublicKey::from_pem(pem)?);
        }
        if let Some(path) = &self.public_key_path {
            return WebhookPublicKey::from_file(path);
        }
        Err(crate::Error::Config(
            "no webhook public key configured (set public_key or public_key_path)".to_string(),
        ))
    }
}
