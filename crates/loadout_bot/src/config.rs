//! Bot configuration loaded from TOML.

use loadout_core::DEFAULT_LANGUAGE;
use loadout_error::{ConfigError, LoadoutResult};
use loadout_upstream::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS, UpstreamConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the Fortnite-API.com key.
pub const API_KEY_ENV: &str = "FORTNITE_API_KEY";

/// Configuration for the bot server.
///
/// Every section and field is optional; an empty file is a valid config.
///
/// # Example
///
/// ```toml
/// [api]
/// timeout_seconds = 10
///
/// [cache]
/// snapshot_dir = "/var/lib/loadout/cache"
/// languages = ["en", "es", "ja"]
///
/// [schedule]
/// refresh_interval_seconds = 600
/// diff_interval_seconds = 120
///
/// [dispatch]
/// max_concurrent_deliveries = 16
///
/// [guilds]
/// path = "/var/lib/loadout/guilds.json"
///
/// [logging]
/// level = "debug"
/// json = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Upstream API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Catalog languages and snapshot location
    #[serde(default)]
    pub cache: CacheConfig,
    /// Loop intervals
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Webhook fan-out settings
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Guild settings file
    #[serde(default)]
    pub guilds: GuildsConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BotConfig {
    /// Load bot configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> LoadoutResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> LoadoutResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Fill the API key from [`API_KEY_ENV`] when the file did not set one.
    pub fn with_env_overrides(self) -> Self {
        let key = std::env::var(API_KEY_ENV).ok();
        self.with_api_key_fallback(key)
    }

    fn with_api_key_fallback(mut self, key: Option<String>) -> Self {
        if self.api.api_key.is_empty() {
            if let Some(key) = key {
                self.api.api_key = key;
            }
        }
        self
    }

    /// Reject values the loops cannot run with.
    pub fn validate(&self) -> LoadoutResult<()> {
        if self.schedule.refresh_interval_seconds == 0 || self.schedule.diff_interval_seconds == 0 {
            return Err(
                ConfigError::in_section("schedule", "Loop intervals must be at least one second")
                    .into(),
            );
        }
        if self.cache.languages.is_empty() {
            return Err(
                ConfigError::in_section("cache", "At least one catalog language is required").into(),
            );
        }
        if self.api.timeout_seconds == 0 {
            return Err(
                ConfigError::in_section("api", "timeout_seconds must be at least one").into(),
            );
        }
        if self.dispatch.webhook_timeout_seconds == 0 {
            return Err(ConfigError::in_section(
                "dispatch",
                "webhook_timeout_seconds must be at least one",
            )
            .into());
        }
        Ok(())
    }

    /// Upstream client settings derived from `[api]`.
    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig::builder()
            .base_url(self.api.base_url.clone())
            .api_key(self.api.api_key.clone())
            .timeout(Duration::from_secs(self.api.timeout_seconds))
            .build()
            .unwrap_or_default()
    }
}

/// `[api]` section.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API host
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key; falls back to `FORTNITE_API_KEY`
    #[serde(default)]
    pub api_key: String,
    /// Per-request timeout
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_seconds: default_api_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the last-known-good snapshots
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    /// Languages kept in the catalog
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Language of the new-items feed
    #[serde(default = "default_diff_language")]
    pub diff_language: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
            languages: default_languages(),
            diff_language: default_diff_language(),
        }
    }
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_languages() -> Vec<String> {
    vec![DEFAULT_LANGUAGE.to_string()]
}

fn default_diff_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// `[schedule]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Catalog refresh period
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    /// New-items diff period
    #[serde(default = "default_diff_interval")]
    pub diff_interval_seconds: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: default_refresh_interval(),
            diff_interval_seconds: default_diff_interval(),
        }
    }
}

fn default_refresh_interval() -> u64 {
    600
}

fn default_diff_interval() -> u64 {
    120
}

/// `[dispatch]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Guilds delivered to at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_deliveries: usize,
    /// Per-POST timeout
    #[serde(default = "default_webhook_timeout")]
    pub webhook_timeout_seconds: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_deliveries: default_max_concurrent(),
            webhook_timeout_seconds: default_webhook_timeout(),
        }
    }
}

fn default_max_concurrent() -> usize {
    loadout_social::DEFAULT_MAX_CONCURRENT_DELIVERIES
}

fn default_webhook_timeout() -> u64 {
    10
}

/// `[guilds]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildsConfig {
    /// JSON file of guild records
    #[serde(default = "default_guilds_path")]
    pub path: PathBuf,
}

impl Default for GuildsConfig {
    fn default() -> Self {
        Self {
            path: default_guilds_path(),
        }
    }
}

fn default_guilds_path() -> PathBuf {
    PathBuf::from("guilds.json")
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Loop periods resolved from [`ScheduleConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotSchedule {
    /// Refresh loop period
    pub refresh_interval: Duration,
    /// Diff loop period
    pub diff_interval: Duration,
}

impl From<&BotConfig> for BotSchedule {
    fn from(config: &BotConfig) -> Self {
        Self {
            refresh_interval: Duration::from_secs(config.schedule.refresh_interval_seconds),
            diff_interval: Duration::from_secs(config.schedule.diff_interval_seconds),
        }
    }
}
