//! Playlist types.

use serde_json::Value as JsonValue;

/// Id prefix shared by every playlist.
pub const PLAYLIST_ID_PREFIX: &str = "playlist_";

/// A game mode playlist.
///
/// # Examples
///
/// ```
/// use loadout_core::Playlist;
///
/// let named = Playlist::new("Playlist_DefaultSolo", Some("Solo".into()), None);
/// assert_eq!(named.display_label(), "Solo");
///
/// let unnamed = Playlist::new("Playlist_Creative_Hub", None, None);
/// assert_eq!(unnamed.display_label(), "Creative_Hub");
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct Playlist {
    /// Playlist id, e.g. `Playlist_DefaultSolo`
    id: String,
    /// Display name; some playlists have none
    name: Option<String>,
    /// Secondary name shown under the title
    sub_name: Option<String>,
    /// Upstream object the playlist was parsed from
    raw: JsonValue,
}

impl Playlist {
    /// Create a playlist without a raw payload.
    pub fn new(id: impl Into<String>, name: Option<String>, sub_name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
            sub_name,
            raw: JsonValue::Null,
        }
    }

    /// Attach the upstream object this playlist came from.
    pub fn with_raw(mut self, raw: JsonValue) -> Self {
        self.raw = raw;
        self
    }

    /// Label used when searching by name.
    ///
    /// `name sub_name` when both exist, `name` alone when there is no
    /// sub name, otherwise the id without its `playlist_` prefix.
    pub fn display_label(&self) -> String {
        match (&self.name, &self.sub_name) {
            (Some(name), Some(sub)) => format!("{} {}", name, sub),
            (Some(name), None) => name.clone(),
            (None, _) => strip_prefix_ignore_case(&self.id, PLAYLIST_ID_PREFIX).to_string(),
        }
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> &'a str {
    match value.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &value[prefix.len()..],
        _ => value,
    }
}
