//! Guild store backed by a JSON file.

use crate::guild_store::{GuildStore, apply_destination, enabled_records, modify};
use loadout_core::{GuildId, GuildRecord, NotificationCategory};
use loadout_error::{GuildStoreError, GuildStoreErrorKind, LoadoutResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::instrument;

fn backend_error(message: String) -> GuildStoreError {
    GuildStoreError::new(GuildStoreErrorKind::Backend(message))
}

/// Guild store persisted as a JSON array of [`GuildRecord`]s.
///
/// The file is read once when opened and rewritten after every mutation.
/// A mutation is only applied in memory once the rewrite succeeded, so the
/// file and the in-memory view never disagree.
#[derive(Debug)]
pub struct JsonFileGuildStore {
    path: PathBuf,
    records: Mutex<BTreeMap<GuildId, GuildRecord>>,
}

impl JsonFileGuildStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> LoadoutResult<Self> {
        let path = path.as_ref().to_path_buf();

        let records: Vec<GuildRecord> = match tokio::fs::read(&path).await {
            Ok(data) => serde_json::from_slice(&data)
                .map_err(|e| backend_error(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("Guild file does not exist yet, starting empty");
                Vec::new()
            }
            Err(e) => return Err(backend_error(format!("{}: {}", path.display(), e)).into()),
        };

        tracing::info!(guilds = records.len(), "Loaded guild settings");
        Ok(Self {
            path,
            records: Mutex::new(
                records
                    .into_iter()
                    .map(|record| (*record.guild_id(), record))
                    .collect(),
            ),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &BTreeMap<GuildId, GuildRecord>) -> Result<(), GuildStoreError> {
        let list: Vec<&GuildRecord> = records.values().collect();
        let data = serde_json::to_vec_pretty(&list)
            .map_err(|e| backend_error(format!("serialize guilds: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| backend_error(format!("{}: {}", parent.display(), e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &data)
            .await
            .map_err(|e| backend_error(format!("{}: {}", temp_path.display(), e)))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| backend_error(format!("{}: {}", self.path.display(), e)))?;

        tracing::debug!(guilds = list.len(), "Rewrote guild file");
        Ok(())
    }

    /// Apply `change` to a copy, persist it, then publish it.
    async fn update<T>(
        &self,
        change: impl FnOnce(&mut BTreeMap<GuildId, GuildRecord>) -> Result<T, GuildStoreError>,
    ) -> LoadoutResult<T> {
        let mut records = self.records.lock().await;
        let mut next = records.clone();
        let outcome = change(&mut next)?;
        self.persist(&next).await?;
        *records = next;
        Ok(outcome)
    }
}

#[async_trait::async_trait]
impl GuildStore for JsonFileGuildStore {
    async fn find_enabled(&self) -> LoadoutResult<Vec<GuildRecord>> {
        Ok(enabled_records(&*self.records.lock().await))
    }

    async fn get(&self, guild_id: GuildId) -> LoadoutResult<Option<GuildRecord>> {
        Ok(self.records.lock().await.get(&guild_id).cloned())
    }

    #[instrument(skip(self, record), fields(guild_id = %record.guild_id()))]
    async fn upsert(&self, record: GuildRecord) -> LoadoutResult<()> {
        self.update(|records| {
            records.insert(*record.guild_id(), record);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn set_category(
        &self,
        guild_id: GuildId,
        category: NotificationCategory,
        enabled: bool,
    ) -> LoadoutResult<()> {
        self.update(|records| {
            modify(records, guild_id, |record| {
                record.notifications_mut().set_category(category, enabled)
            })
        })
        .await
    }

    #[instrument(skip(self, url))]
    async fn set_destination(&self, guild_id: GuildId, url: Option<String>) -> LoadoutResult<()> {
        self.update(|records| modify(records, guild_id, |record| apply_destination(record, url)))
            .await
    }

    #[instrument(skip(self))]
    async fn remove(&self, guild_id: GuildId) -> LoadoutResult<bool> {
        self.update(|records| Ok(records.remove(&guild_id).is_some()))
            .await
    }
}
