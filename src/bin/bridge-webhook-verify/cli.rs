//! Command-line interface definition.

use bridge_webhook::config::BridgeConfig;
use clap::Parser;
use std::path::PathBuf;

/// Verify a captured Bridge.xyz webhook delivery.
#[derive(Parser, Debug)]
#[command(name = "bridge-webhook-verify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File holding the raw request body, byte for byte ("-" reads stdin).
    #[arg(long, short)]
    pub body: PathBuf,

    /// Signature header value, `t=<timestamp_ms>,v0=<signature>`.
    #[arg(long, short, env = "BRIDGE_WEBHOOK_SIGNATURE")]
    pub signature: String,

    /// Path to the provider's PEM public key.
    #[arg(long = "public-key", short = 'k', env = "BRIDGE_WEBHOOK_PUBLIC_KEY_PATH")]
    pub public_key_path: Option<PathBuf>,

    /// Freshness window in milliseconds.
    #[arg(long, env = "BRIDGE_WEBHOOK_MAX_AGE_MS")]
    pub max_age_ms: Option<u64>,

    /// Allowed clock skew for future timestamps in milliseconds.
    #[arg(long, env = "BRIDGE_WEBHOOK_MAX_FUTURE_SKEW_MS", conflicts_with = "no_future_skew_limit")]
    pub max_future_skew_ms: Option<u64>,

    /// Accept timestamps arbitrarily far in the future.
    #[arg(long)]
    pub no_future_skew_limit: bool,

    /// Skip the freshness check (replaying captured fixtures).
    #[arg(long, env = "BRIDGE_WEBHOOK_ALLOW_REPLAY")]
    pub allow_replay: bool,

    /// Log level.
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Emit logs as JSON.
    #[arg(long)]
    pub json_logs: bool,

    /// Path to configuration file.
    #[arg(long, short, env = "BRIDGE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Build the effective configuration: file (explicit, or the platform
    /// default if present), then CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is specified but cannot be loaded.
    pub fn to_config(&self) -> color_eyre::Result<BridgeConfig> {
        let mut config = match &self.config {
            Some(path) => BridgeConfig::from_file(path)?,
            None => match BridgeConfig::default_path().filter(|p| p.is_file()) {
                Some(path) => BridgeConfig::from_file(&path)?,
                None => BridgeConfig::default(),
            },
        };

        config.log_level.clone_from(&self.log_level);

        let webhook = &mut config.webhook;
        if let Some(path) = &self.public_key_path {
            webhook.public_key = None;
            webhook.public_key_path = Some(path.clone());
        }
        if let Some(max_age_ms) = self.max_age_ms {
            webhook.max_age_ms = max_age_ms;
        }
        if self.no_future_skew_limit {
            webhook.max_future_skew_ms = None;
        } else if let Some(skew) = self.max_future_skew_ms {
            webhook.max_future_skew_ms = Some(skew);
        }
        if self.allow_replay {
            webhook.allow_replay = true;
        }

        Ok(config)
    }
}
