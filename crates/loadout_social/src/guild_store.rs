//! Guild settings storage.

use loadout_core::{GuildId, GuildRecord, NotificationCategory};
use loadout_error::{GuildStoreError, GuildStoreErrorKind, LoadoutResult};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Storage of per-guild notification settings.
///
/// The dispatcher only ever calls [`GuildStore::find_enabled`]; the mutating
/// operations back the configuration commands.
#[async_trait::async_trait]
pub trait GuildStore: Send + Sync {
    /// Every guild whose updates channel is switched on.
    async fn find_enabled(&self) -> LoadoutResult<Vec<GuildRecord>>;

    /// Settings of one guild, if known.
    async fn get(&self, guild_id: GuildId) -> LoadoutResult<Option<GuildRecord>>;

    /// Insert or replace a guild's settings.
    async fn upsert(&self, record: GuildRecord) -> LoadoutResult<()>;

    /// Switch one category on or off.
    ///
    /// # Errors
    ///
    /// Returns `GuildStoreErrorKind::NotFound` if the guild is unknown.
    async fn set_category(
        &self,
        guild_id: GuildId,
        category: NotificationCategory,
        enabled: bool,
    ) -> LoadoutResult<()>;

    /// Replace the webhook URL and switch the updates channel on, or off when
    /// `url` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `GuildStoreErrorKind::NotFound` if the guild is unknown.
    async fn set_destination(&self, guild_id: GuildId, url: Option<String>) -> LoadoutResult<()>;

    /// Forget a guild. Returns whether it existed.
    async fn remove(&self, guild_id: GuildId) -> LoadoutResult<bool>;
}

/// Apply a mutation to one record held in a map.
pub(crate) fn modify(
    records: &mut BTreeMap<GuildId, GuildRecord>,
    guild_id: GuildId,
    apply: impl FnOnce(&mut GuildRecord),
) -> Result<(), GuildStoreError> {
    let record = records
        .get_mut(&guild_id)
        .ok_or_else(|| GuildStoreError::new(GuildStoreErrorKind::NotFound(guild_id.0)))?;
    apply(record);
    Ok(())
}

pub(crate) fn apply_destination(record: &mut GuildRecord, url: Option<String>) {
    let notifications = record.notifications_mut();
    notifications.set_enabled(url.is_some());
    notifications.set_destination_url(url);
}

pub(crate) fn enabled_records(records: &BTreeMap<GuildId, GuildRecord>) -> Vec<GuildRecord> {
    records
        .values()
        .filter(|record| *record.notifications().enabled())
        .cloned()
        .collect()
}

/// Guild store kept entirely in memory.
///
/// # Examples
///
/// ```
/// use loadout_core::{GuildId, GuildNotificationConfig, GuildRecord};
/// use loadout_social::{GuildStore, InMemoryGuildStore};
///
/// # async fn example() -> loadout_error::LoadoutResult<()> {
/// let store = InMemoryGuildStore::new();
/// store.upsert(GuildRecord::new(GuildId(1))).await?;
/// store
///     .upsert(GuildRecord::new(GuildId(2)).with_notifications(
///         GuildNotificationConfig::enabled_for("https://discord.com/api/webhooks/2/x"),
///     ))
///     .await?;
///
/// let enabled = store.find_enabled().await?;
/// assert_eq!(enabled.len(), 1);
/// assert_eq!(*enabled[0].guild_id(), GuildId(2));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryGuildStore {
    records: RwLock<BTreeMap<GuildId, GuildRecord>>,
}

impl InMemoryGuildStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`.
    pub fn with_records(records: impl IntoIterator<Item = GuildRecord>) -> Self {
        Self {
            records: RwLock::new(
                records
                    .into_iter()
                    .map(|record| (*record.guild_id(), record))
                    .collect(),
            ),
        }
    }
}

#[async_trait::async_trait]
impl GuildStore for InMemoryGuildStore {
    async fn find_enabled(&self) -> LoadoutResult<Vec<GuildRecord>> {
        Ok(enabled_records(&self.records.read()))
    }

    async fn get(&self, guild_id: GuildId) -> LoadoutResult<Option<GuildRecord>> {
        Ok(self.records.read().get(&guild_id).cloned())
    }

    async fn upsert(&self, record: GuildRecord) -> LoadoutResult<()> {
        self.records.write().insert(*record.guild_id(), record);
        Ok(())
    }

    async fn set_category(
        &self,
        guild_id: GuildId,
        category: NotificationCategory,
        enabled: bool,
    ) -> LoadoutResult<()> {
        Ok(modify(&mut self.records.write(), guild_id, |record| {
            record.notifications_mut().set_category(category, enabled)
        })?)
    }

    async fn set_destination(&self, guild_id: GuildId, url: Option<String>) -> LoadoutResult<()> {
        Ok(modify(&mut self.records.write(), guild_id, |record| {
            apply_destination(record, url)
        })?)
    }

    async fn remove(&self, guild_id: GuildId) -> LoadoutResult<bool> {
        Ok(self.records.write().remove(&guild_id).is_some())
    }
}
