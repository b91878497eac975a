//! Guild notification settings.

use crate::NotificationCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Discord guild (server) identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct GuildId(pub u64);

/// Per-guild update channel settings.
///
/// A category absent from `category_toggle` is treated as enabled, matching
/// the defaults new guilds are created with.
///
/// # Examples
///
/// ```
/// use loadout_core::{GuildNotificationConfig, NotificationCategory};
///
/// let config = GuildNotificationConfig::enabled_for("https://discord.com/api/webhooks/1/abc")
///     .with_category(NotificationCategory::News, false);
///
/// assert!(config.is_category_enabled(NotificationCategory::Cosmetics));
/// assert!(!config.is_category_enabled(NotificationCategory::News));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GuildNotificationConfig {
    /// Whether the updates channel is switched on at all
    #[serde(default)]
    enabled: bool,
    /// Webhook URL of the updates channel
    #[serde(default)]
    destination_url: Option<String>,
    /// Per-category switches
    #[serde(default)]
    category_toggle: BTreeMap<NotificationCategory, bool>,
}

impl Default for GuildNotificationConfig {
    fn default() -> Self {
        use strum::IntoEnumIterator;

        Self {
            enabled: false,
            destination_url: None,
            category_toggle: NotificationCategory::iter().map(|c| (c, true)).collect(),
        }
    }
}

impl GuildNotificationConfig {
    /// Enabled config posting every category to `url`.
    pub fn enabled_for(url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            destination_url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Set one category switch.
    pub fn with_category(mut self, category: NotificationCategory, enabled: bool) -> Self {
        self.category_toggle.insert(category, enabled);
        self
    }

    /// Whether `category` should be delivered to this guild.
    pub fn is_category_enabled(&self, category: NotificationCategory) -> bool {
        self.category_toggle.get(&category).copied().unwrap_or(true)
    }

    /// Switch the updates channel on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Replace the webhook URL.
    pub fn set_destination_url(&mut self, url: Option<String>) {
        self.destination_url = url;
    }

    /// Set one category switch in place.
    pub fn set_category(&mut self, category: NotificationCategory, enabled: bool) {
        self.category_toggle.insert(category, enabled);
    }
}

fn default_language() -> String {
    crate::DEFAULT_LANGUAGE.to_string()
}

/// A guild's stored settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GuildRecord {
    /// Guild id
    guild_id: GuildId,
    /// Language used for this guild's responses
    #[serde(default = "default_language")]
    language: String,
    /// Updates channel settings
    #[serde(default)]
    notifications: GuildNotificationConfig,
}

impl GuildRecord {
    /// New record with default settings (updates channel off).
    pub fn new(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            language: default_language(),
            notifications: GuildNotificationConfig::default(),
        }
    }

    /// Replace the notification settings.
    pub fn with_notifications(mut self, notifications: GuildNotificationConfig) -> Self {
        self.notifications = notifications;
        self
    }

    /// Replace the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Mutable access to the notification settings.
    pub fn notifications_mut(&mut self) -> &mut GuildNotificationConfig {
        &mut self.notifications
    }
}
