//! Webhook message payload types.

use serde::{Deserialize, Serialize};

/// One name/value row inside an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct EmbedField {
    /// Field heading
    name: String,
    /// Field body
    value: String,
    /// Render side by side with neighbouring inline fields
    #[serde(default)]
    inline: bool,
}

/// Image reference (thumbnail).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct EmbedImage {
    /// Image URL
    url: String,
}

/// Text shown at the bottom of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct EmbedFooter {
    /// Footer text
    text: String,
}

/// A rich notification card.
///
/// # Examples
///
/// ```
/// use loadout_social::Embed;
///
/// let embed = Embed::default()
///     .with_title("New cosmetics detected!")
///     .with_color(0xf0b132_u32)
///     .add_field("ID", "`CID_001`", false);
///
/// let json = serde_json::to_value(&embed).unwrap();
/// assert_eq!(json["title"], "New cosmetics detected!");
/// assert!(json.get("footer").is_none());
/// ```
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_", strip_option, into)]
pub struct Embed {
    /// Heading, only set on the first card of a dispatch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    /// Side bar colour as `0xRRGGBB`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<u32>,
    /// Rows in display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[setters(skip)]
    fields: Vec<EmbedField>,
    /// Small image in the top right corner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[setters(skip)]
    thumbnail: Option<EmbedImage>,
    /// Footer line, only set on the last card of a dispatch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[setters(skip)]
    footer: Option<EmbedFooter>,
}

impl Embed {
    /// Append a field.
    pub fn add_field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Set the thumbnail image.
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(EmbedImage { url: url.into() });
        self
    }

    /// Set the footer text.
    pub fn with_footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    pub(crate) fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub(crate) fn set_footer(&mut self, text: impl Into<String>) {
        self.footer = Some(EmbedFooter { text: text.into() });
    }
}

/// Body of one webhook POST: `{"embeds": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct WebhookPayload {
    /// At most ten cards
    embeds: Vec<Embed>,
}

impl WebhookPayload {
    /// Wrap a page of cards.
    pub fn new(embeds: Vec<Embed>) -> Self {
        Self { embeds }
    }
}
