//! Core data types for the Loadout update bot.
//!
//! Cosmetics, playlists, the new-items baseline and guild notification
//! settings shared by every other crate in the workspace.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cosmetic;
mod guild;
mod notification;
mod playlist;
mod snapshot;

pub use cosmetic::{CosmeticItem, CosmeticItemBuilder, CosmeticItemBuilderError, CosmeticType, Rarity};
pub use guild::{GuildId, GuildNotificationConfig, GuildRecord};
pub use notification::NotificationCategory;
pub use playlist::{PLAYLIST_ID_PREFIX, Playlist};
pub use snapshot::NewItemsSnapshot;

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";
