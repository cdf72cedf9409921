//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Telegram API configuration
    pub telegram: TelegramConfig,

    /// Webhook configuration
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API secret token
    pub token: String,

    /// Bot API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Long-poll timeout for development mode
    #[serde(default = "default_poll_timeout", with = "humantime_serde")]
    pub poll_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Externally reachable host the platform delivers updates to
    #[serde(default)]
    pub host: Option<String>,

    /// Port the HTTP server binds to
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Directory containing the sound assets
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,

    /// Path of the usage counter database
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Path of the metrics snapshot file
    #[serde(default = "default_metrics_path")]
    pub metrics_path: PathBuf,

    /// Comma-separated numeric user ids allowed to view /stats
    #[serde(default)]
    pub allowed_users: String,

    /// "development" switches to long polling without an HTTP server
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            asset_dir: default_asset_dir(),
            db_path: default_db_path(),
            metrics_path: default_metrics_path(),
            allowed_users: String::new(),
            environment: default_environment(),
            log_level: default_log_level(),
        }
    }
}

impl BotConfig {
    /// Parse the configured allow-list. Malformed entries are skipped.
    pub fn allowed_user_ids(&self) -> Vec<i64> {
        self.allowed_users
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect()
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

// Default value functions
fn default_api_url() -> String {
    telegram_client::DEFAULT_API_URL.into()
}

fn default_poll_timeout() -> Duration {
    Duration::from_secs(25)
}

fn default_port() -> u16 {
    8443
}

fn default_asset_dir() -> PathBuf {
    "sounds".into()
}

fn default_db_path() -> PathBuf {
    "command_stats.db".into()
}

fn default_metrics_path() -> PathBuf {
    "metrics_snapshot.json".into()
}

fn default_environment() -> String {
    "production".into()
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Keep strings as strings; the allow-list is parsed by hand
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
