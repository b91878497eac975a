//! Cosmetic item types.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Cosmetic categories the catalog buckets items by.
///
/// Upstream `type.value` strings outside the known set parse as [`CosmeticType::Other`].
///
/// # Examples
///
/// ```
/// use loadout_core::CosmeticType;
///
/// assert_eq!(CosmeticType::from_upstream("loadingscreen"), CosmeticType::LoadingScreen);
/// assert_eq!(CosmeticType::from_upstream("pet"), CosmeticType::Other);
/// assert_eq!(CosmeticType::Outfit.to_string(), "outfit");
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
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CosmeticType {
    /// Character skin
    Outfit,
    /// Dance or gesture
    Emote,
    /// Back bling
    Backpack,
    /// Harvesting tool
    Pickaxe,
    /// Weapon/vehicle wrap
    Wrap,
    /// Skydiving trail
    Contrail,
    /// Loading screen art
    LoadingScreen,
    /// Spray decal
    Spray,
    /// Glider
    Glider,
    /// Banner icon
    Banner,
    /// Anything else the API reports (music packs, pets, ...)
    Other,
}

impl CosmeticType {
    /// Map an upstream `type.value` string onto a category.
    pub fn from_upstream(value: &str) -> Self {
        value.parse().unwrap_or(CosmeticType::Other)
    }

    /// Whether the catalog keeps a dedicated bucket for this category.
    pub fn is_bucketed(self) -> bool {
        self != CosmeticType::Other
    }
}

/// Rarity tier with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct Rarity {
    /// Machine value, e.g. `legendary`
    value: String,
    /// Localised label, e.g. `Legendary`
    display_value: String,
}

impl Rarity {
    /// Create a rarity from its machine value and display label.
    pub fn new(value: impl Into<String>, display_value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display_value: display_value.into(),
        }
    }

    /// Embed colour used when rendering cards for this rarity.
    ///
    /// # Examples
    ///
    /// ```
    /// use loadout_core::Rarity;
    ///
    /// assert_eq!(Rarity::new("legendary", "Legendary").color(), 0xf0b132);
    /// assert_eq!(Rarity::new("mythic", "Mythic").color(), 0xffffff);
    /// ```
    pub fn color(&self) -> u32 {
        match self.value.as_str() {
            "legendary" => 0xf0b132,
            "epic" => 0x9d4dbb,
            "rare" => 0x0086ff,
            "uncommon" => 0x65b851,
            "common" => 0x575757,
            "icon" => 0x00ffff,
            "marvel" => 0xed1d24,
            "shadow" => 0x292929,
            "dc" => 0x2b3147,
            "slurp" => 0x09e0f0,
            "dark" => 0xff00ff,
            "frozen" => 0x93f7f6,
            "lava" => 0xf55f35,
            "starwars" => 0xcccc00,
            "gaminglegends" => 0x0e004d,
            _ => 0xffffff,
        }
    }
}

/// Immutable snapshot of one catalog entry.
///
/// Equality is structural over every field, including the raw upstream
/// object, so two entries sharing an id but differing in any attribute are
/// distinct.
///
/// # Examples
///
/// ```
/// use loadout_core::{CosmeticItem, CosmeticType, Rarity};
///
/// let item = CosmeticItem::builder()
///     .id("CID_028_Athena_Commando_F")
///     .name("Renegade Raider")
///     .cosmetic_type(CosmeticType::Outfit)
///     .rarity(Rarity::new("rare", "Rare"))
///     .build()
///     .unwrap();
///
/// assert_eq!(item.name(), "Renegade Raider");
/// assert!(item.introduction().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct CosmeticItem {
    /// Identifier, unique within a language
    id: String,
    /// Display name
    name: String,
    /// Category
    cosmetic_type: CosmeticType,
    /// Rarity tier
    rarity: Rarity,
    /// Introduction text, e.g. "Introduced in Chapter 1, Season 1."
    #[builder(default, setter(into, strip_option))]
    introduction: Option<String>,
    /// Set name
    #[builder(default, setter(into, strip_option))]
    set_name: Option<String>,
    /// Icon image URL
    #[builder(default, setter(into, strip_option))]
    icon_url: Option<String>,
    /// Upstream object the item was parsed from
    #[builder(default)]
    raw: JsonValue,
}

impl CosmeticItem {
    /// Creates a new cosmetic item builder.
    pub fn builder() -> CosmeticItemBuilder {
        CosmeticItemBuilder::default()
    }
}
