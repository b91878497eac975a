//! Guild settings and update notifications for Loadout.
//!
//! This crate owns everything between "here are some new things" and
//! "each subscribed guild's updates channel received them":
//!
//! - [`GuildStore`]: the narrow view of guild settings the dispatcher needs
//! - [`cosmetic_card`] and [`paginate`]: turning items into webhook embeds
//! - [`WebhookSender`]: one POST to one destination
//! - [`Dispatcher`]: bounded concurrent fan-out with per-guild isolation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dispatcher;
mod embed;
mod guild_store;
mod json_store;
mod render;
mod webhook;

pub use dispatcher::{DEFAULT_MAX_CONCURRENT_DELIVERIES, DispatchReport, Dispatcher};
pub use embed::{Embed, EmbedField, EmbedFooter, EmbedImage, WebhookPayload};
pub use guild_store::{GuildStore, InMemoryGuildStore};
pub use json_store::JsonFileGuildStore;
pub use render::{MAX_EMBEDS_PER_MESSAGE, cosmetic_card, footer_text, paginate};
pub use webhook::{HttpWebhookSender, WebhookSender};
