//! Conversion of upstream JSON envelopes into core types.
//!
//! Every response is wrapped as `{"status": 200, "data": ...}`. A payload
//! whose envelope is wrong fails as a whole; a single bad entry inside
//! `data` is logged and skipped.

use loadout_core::{CosmeticItem, CosmeticType, NewItemsSnapshot, Playlist, Rarity};
use loadout_error::{LoadoutResult, UpstreamError, UpstreamErrorKind};
use serde_json::Value as JsonValue;

fn parse_error(message: impl Into<String>) -> UpstreamError {
    UpstreamError::new(UpstreamErrorKind::Parse(message.into()))
}

/// `payload.data` as an array, or a parse error.
fn data_array<'a>(payload: &'a JsonValue, what: &str) -> LoadoutResult<&'a Vec<JsonValue>> {
    Ok(payload
        .get("data")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| parse_error(format!("{} payload has no data array", what)))?)
}

/// Text of a nested `{"text": ...}` object, tolerating `null`.
fn nested_text(value: &JsonValue, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(|inner| inner.get("text"))
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}

/// Parse one cosmetic object.
///
/// `type.value` strings outside the known set map to [`CosmeticType::Other`].
/// The icon falls back to `images.smallIcon` when `images.icon` is absent.
///
/// # Errors
///
/// Returns a parse error if `id`, `name` or `rarity` is missing.
pub fn parse_cosmetic(value: &JsonValue) -> LoadoutResult<CosmeticItem> {
    let id = value
        .get("id")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| parse_error("cosmetic without id"))?;
    let name = value
        .get("name")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| parse_error(format!("cosmetic {} without name", id)))?;

    let cosmetic_type = value
        .get("type")
        .and_then(|t| t.get("value"))
        .and_then(JsonValue::as_str)
        .map_or(CosmeticType::Other, CosmeticType::from_upstream);

    let rarity = value
        .get("rarity")
        .ok_or_else(|| parse_error(format!("cosmetic {} without rarity", id)))?;
    let rarity_value = rarity
        .get("value")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| parse_error(format!("cosmetic {} has rarity without value", id)))?;
    let rarity_display = rarity
        .get("displayValue")
        .and_then(JsonValue::as_str)
        .unwrap_or(rarity_value);

    let mut builder = CosmeticItem::builder();
    builder
        .id(id)
        .name(name)
        .cosmetic_type(cosmetic_type)
        .rarity(Rarity::new(rarity_value, rarity_display))
        .raw(value.clone());

    if let Some(text) = nested_text(value, "introduction") {
        builder.introduction(text);
    }
    if let Some(text) = nested_text(value, "set") {
        builder.set_name(text);
    }
    let icon = value.get("images").and_then(|images| {
        images
            .get("icon")
            .and_then(JsonValue::as_str)
            .or_else(|| images.get("smallIcon").and_then(JsonValue::as_str))
    });
    if let Some(icon) = icon {
        builder.icon_url(icon);
    }

    Ok(builder
        .build()
        .map_err(|e| parse_error(format!("cosmetic {}: {}", id, e)))?)
}

/// Parse every cosmetic in a `/v2/cosmetics/br` payload.
///
/// # Errors
///
/// Returns a parse error if the payload has no `data` array.
#[tracing::instrument(skip(payload))]
pub fn parse_cosmetics(payload: &JsonValue) -> LoadoutResult<Vec<CosmeticItem>> {
    let entries = data_array(payload, "cosmetics")?;
    let items: Vec<_> = entries
        .iter()
        .filter_map(|entry| match parse_cosmetic(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed cosmetic");
                None
            }
        })
        .collect();

    tracing::debug!(entries = entries.len(), parsed = items.len(), "Parsed cosmetics");
    Ok(items)
}

/// Parse every playlist in a `/v1/playlists` payload.
///
/// # Errors
///
/// Returns a parse error if the payload has no `data` array.
#[tracing::instrument(skip(payload))]
pub fn parse_playlists(payload: &JsonValue) -> LoadoutResult<Vec<Playlist>> {
    let entries = data_array(payload, "playlists")?;
    let playlists: Vec<_> = entries
        .iter()
        .filter_map(|entry| {
            let Some(id) = entry.get("id").and_then(JsonValue::as_str) else {
                tracing::warn!("Skipping playlist without id");
                return None;
            };
            let text = |field: &str| entry.get(field).and_then(JsonValue::as_str).map(str::to_string);
            Some(Playlist::new(id, text("name"), text("subName")).with_raw(entry.clone()))
        })
        .collect();

    tracing::debug!(entries = entries.len(), parsed = playlists.len(), "Parsed playlists");
    Ok(playlists)
}

/// A `/v2/cosmetics/br/new` response.
///
/// Keeps the raw payload next to the parsed snapshot because the raw payload
/// is what gets persisted as the next diff baseline.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct NewItemsFeed {
    /// Parsed hash and items
    snapshot: NewItemsSnapshot,
    /// Payload exactly as received
    raw: JsonValue,
}

impl NewItemsFeed {
    /// Parse a feed payload of shape `{"data": {"hash": ..., "items": [...]}}`.
    ///
    /// # Errors
    ///
    /// Returns a parse error if `data.hash` or `data.items` is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use loadout_upstream::NewItemsFeed;
    /// use serde_json::json;
    ///
    /// let feed = NewItemsFeed::from_payload(json!({
    ///     "data": {"hash": "abc", "items": []}
    /// })).unwrap();
    /// assert_eq!(feed.snapshot().hash(), "abc");
    ///
    /// assert!(NewItemsFeed::from_payload(json!({"data": {}})).is_err());
    /// ```
    pub fn from_payload(raw: JsonValue) -> LoadoutResult<Self> {
        let data = raw
            .get("data")
            .ok_or_else(|| parse_error("new items payload has no data"))?;
        let hash = data
            .get("hash")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| parse_error("new items payload has no hash"))?;
        let entries = data
            .get("items")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| parse_error("new items payload has no items array"))?;

        let items = entries
            .iter()
            .filter_map(|entry| match parse_cosmetic(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed new item");
                    None
                }
            })
            .collect();

        let snapshot = NewItemsSnapshot::new(hash, items);
        Ok(Self { snapshot, raw })
    }

    /// Split into the parsed snapshot and the raw payload.
    pub fn into_parts(self) -> (NewItemsSnapshot, JsonValue) {
        (self.snapshot, self.raw)
    }
}
