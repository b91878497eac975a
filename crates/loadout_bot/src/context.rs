//! Process-wide shared state.

use crate::BotConfig;
use loadout_catalog::{Catalog, CatalogRegistry};
use loadout_core::DEFAULT_LANGUAGE;
use loadout_error::LoadoutResult;
use loadout_social::{Dispatcher, HttpWebhookSender, JsonFileGuildStore};
use loadout_storage::{FileSystemSnapshots, SnapshotStorage};
use loadout_upstream::{UpstreamClient, UpstreamConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Everything the loops and command handlers share.
///
/// Built once at startup and passed around as `Arc<AppContext>`. The
/// upstream client is created on first use.
pub struct AppContext {
    catalogs: CatalogRegistry,
    snapshots: Arc<dyn SnapshotStorage>,
    upstream_config: UpstreamConfig,
    upstream: OnceCell<Arc<UpstreamClient>>,
    dispatcher: Dispatcher,
    languages: Vec<String>,
    diff_language: String,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("languages", &self.languages)
            .field("diff_language", &self.diff_language)
            .field("upstream_ready", &self.upstream.initialized())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Create a context for the default language.
    pub fn new(
        upstream_config: UpstreamConfig,
        snapshots: Arc<dyn SnapshotStorage>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            catalogs: CatalogRegistry::new(),
            snapshots,
            upstream_config,
            upstream: OnceCell::new(),
            dispatcher,
            languages: vec![DEFAULT_LANGUAGE.to_string()],
            diff_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Languages the refresh loop keeps catalogs for.
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    /// Language of the new-items feed.
    pub fn with_diff_language(mut self, language: impl Into<String>) -> Self {
        self.diff_language = language.into();
        self
    }

    /// Wire up the production backends described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the snapshot directory cannot be created, the guild
    /// file is unreadable or the webhook client cannot be built.
    #[tracing::instrument(skip(config))]
    pub async fn from_config(config: &BotConfig) -> LoadoutResult<Self> {
        let snapshots = Arc::new(FileSystemSnapshots::new(&config.cache.snapshot_dir)?);
        let guilds = Arc::new(JsonFileGuildStore::open(&config.guilds.path).await?);
        let sender = Arc::new(HttpWebhookSender::new(Duration::from_secs(
            config.dispatch.webhook_timeout_seconds,
        ))?);
        let dispatcher = Dispatcher::new(guilds, sender)
            .with_max_concurrent(config.dispatch.max_concurrent_deliveries);

        Ok(Self::new(config.upstream_config(), snapshots, dispatcher)
            .with_languages(config.cache.languages.clone())
            .with_diff_language(config.cache.diff_language.clone()))
    }

    /// The upstream client, created on first call.
    ///
    /// # Errors
    ///
    /// Returns error if the client cannot be built; the next call retries.
    pub async fn upstream(&self) -> LoadoutResult<Arc<UpstreamClient>> {
        let client = self
            .upstream
            .get_or_try_init(|| async {
                tracing::info!(base_url = %self.upstream_config.base_url(), "Creating upstream client");
                UpstreamClient::new(self.upstream_config.clone(), Arc::clone(&self.snapshots))
                    .map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(client))
    }

    /// Catalog for `language`, created empty if needed.
    pub fn catalog(&self, language: &str) -> Arc<Catalog> {
        self.catalogs.get_or_create(language)
    }

    /// All catalogs.
    pub fn catalogs(&self) -> &CatalogRegistry {
        &self.catalogs
    }

    /// Snapshot backend.
    pub fn snapshots(&self) -> &Arc<dyn SnapshotStorage> {
        &self.snapshots
    }

    /// Notification dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Languages refreshed each cycle.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Language of the new-items feed.
    pub fn diff_language(&self) -> &str {
        &self.diff_language
    }
}
