//! Notification categories.

use serde::{Deserialize, Serialize};

/// Kinds of update a guild can subscribe to.
///
/// # Examples
///
/// ```
/// use loadout_core::NotificationCategory;
///
/// let category: NotificationCategory = "shopsections".parse().unwrap();
/// assert_eq!(category, NotificationCategory::ShopSections);
/// assert_eq!(NotificationCategory::Cosmetics.to_string(), "cosmetics");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationCategory {
    /// Newly added cosmetic items
    Cosmetics,
    /// Playlist changes
    Playlists,
    /// In-game news
    News,
    /// AES key changes
    Aes,
    /// Item shop section changes
    ShopSections,
}

impl NotificationCategory {
    /// Heading placed on the first card of a dispatch.
    pub fn title(self) -> &'static str {
        match self {
            NotificationCategory::Cosmetics => "New cosmetics detected!",
            NotificationCategory::Playlists => "New playlists detected!",
            NotificationCategory::News => "News updated!",
            NotificationCategory::Aes => "AES key changed!",
            NotificationCategory::ShopSections => "Shop sections updated!",
        }
    }
}
