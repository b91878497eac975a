//! Upstream connection settings.

use std::time::Duration;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://fortnite-api.com";

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;

/// Connection settings for [`crate::UpstreamClient`].
///
/// # Examples
///
/// ```
/// use loadout_upstream::{UpstreamConfig, DEFAULT_BASE_URL};
/// use std::time::Duration;
///
/// let config = UpstreamConfig::builder().api_key("secret").build().unwrap();
/// assert_eq!(config.base_url(), DEFAULT_BASE_URL);
/// assert_eq!(*config.timeout(), Duration::from_secs(20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct UpstreamConfig {
    /// Scheme and host, without a trailing slash
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    /// Value of the `Authorization` header; omitted when empty
    #[builder(default)]
    api_key: String,
    /// Timeout applied to every request
    #[builder(default = "Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)")]
    timeout: Duration,
}

impl UpstreamConfig {
    /// Creates a new config builder.
    pub fn builder() -> UpstreamConfigBuilder {
        UpstreamConfigBuilder::default()
    }

    /// Absolute URL for an API path such as `/v2/news`.
    pub(crate) fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}
