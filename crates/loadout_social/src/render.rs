//! Notification card rendering and pagination.

use crate::Embed;
use loadout_core::{CosmeticItem, NotificationCategory};

/// Webhooks accept at most this many embeds per message.
pub const MAX_EMBEDS_PER_MESSAGE: usize = 10;

const ATTRIBUTION: &str = "Provided by Fortnite-API.com";

/// Card announcing one new cosmetic.
///
/// # Examples
///
/// ```
/// use loadout_core::{CosmeticItem, CosmeticType, Rarity};
/// use loadout_social::cosmetic_card;
///
/// let item = CosmeticItem::builder()
///     .id("CID_A")
///     .name("A")
///     .cosmetic_type(CosmeticType::Outfit)
///     .rarity(Rarity::new("epic", "Epic"))
///     .build()
///     .unwrap();
///
/// let card = cosmetic_card(&item);
/// assert_eq!(card.fields()[2].value(), "Not introduced yet");
/// assert_eq!(*card.color(), Some(0x9d4dbb));
/// ```
pub fn cosmetic_card(item: &CosmeticItem) -> Embed {
    let introduction = item
        .introduction()
        .as_ref()
        .map_or_else(|| "Not introduced yet".to_string(), |text| format!("`{}`", text));
    let set_name = item
        .set_name()
        .as_ref()
        .map_or_else(|| "None".to_string(), |text| format!("`{}`", text));

    let card = Embed::default()
        .with_color(item.rarity().color())
        .add_field("ID", format!("`{}`", item.id()), false)
        .add_field("Rarity", format!("`{}`", item.rarity().display_value()), false)
        .add_field("Introduction", introduction, false)
        .add_field("Set", set_name, false);

    match item.icon_url() {
        Some(icon) => card.with_thumbnail(icon.as_str()),
        None => card,
    }
}

/// Footer placed on the last card of a dispatch.
///
/// ```
/// use loadout_core::NotificationCategory;
/// use loadout_social::footer_text;
///
/// assert_eq!(
///     footer_text(3, NotificationCategory::Cosmetics),
///     "3 new cosmetics • Provided by Fortnite-API.com"
/// );
/// ```
pub fn footer_text(count: usize, category: NotificationCategory) -> String {
    format!("{} new {} • {}", count, category, ATTRIBUTION)
}

/// Split cards into webhook-sized pages, preserving order.
///
/// The first card gets the category title and the last card gets the
/// footer. The final page holds the remainder, so no card is dropped.
pub fn paginate(mut cards: Vec<Embed>, category: NotificationCategory) -> Vec<Vec<Embed>> {
    let count = cards.len();
    if let Some(first) = cards.first_mut() {
        first.set_title(category.title());
    }
    if let Some(last) = cards.last_mut() {
        last.set_footer(footer_text(count, category));
    }

    cards
        .chunks(MAX_EMBEDS_PER_MESSAGE)
        .map(<[Embed]>::to_vec)
        .collect()
}
