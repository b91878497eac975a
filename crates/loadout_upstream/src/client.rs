//! HTTP client for the Fortnite content API.

use crate::{AccountType, AesKeyFormat, NewItemsFeed, UpstreamConfig, parse_cosmetics, parse_playlists};
use loadout_core::{CosmeticItem, Playlist};
use loadout_error::{LoadoutError, LoadoutResult, UpstreamError, UpstreamErrorKind};
use loadout_storage::{SnapshotKey, SnapshotStorage};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::instrument;

const COSMETICS_ENDPOINT: &str = "/v2/cosmetics/br";
const NEW_COSMETICS_ENDPOINT: &str = "/v2/cosmetics/br/new";
const PLAYLISTS_ENDPOINT: &str = "/v1/playlists";
const NEWS_ENDPOINT: &str = "/v2/news";
const AES_ENDPOINT: &str = "/v2/aes";
const STATS_ENDPOINT: &str = "/v2/stats/br/v2";
const CREATOR_CODE_ENDPOINT: &str = "/v2/creatorcode/search";

/// Where a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FetchSource {
    /// Fresh response from the API
    Live,
    /// Last persisted payload, served because the API failed
    Snapshot,
}

/// A payload together with its [`FetchSource`].
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct Fetched<T> {
    /// The payload
    payload: T,
    /// Whether it is live or a fallback
    source: FetchSource,
}

impl<T> Fetched<T> {
    /// Wrap a payload.
    pub fn new(payload: T, source: FetchSource) -> Self {
        Self { payload, source }
    }

    /// Unwrap the payload, discarding its source.
    pub fn into_payload(self) -> T {
        self.payload
    }

    /// True when the API failed and the snapshot was used instead.
    pub fn is_fallback(&self) -> bool {
        self.source == FetchSource::Snapshot
    }
}

/// Client for Fortnite-API.com.
///
/// Cheap to clone; the underlying connection pool and snapshot backend are
/// shared.
#[derive(Clone)]
pub struct UpstreamClient {
    config: UpstreamConfig,
    client: reqwest::Client,
    snapshots: Arc<dyn SnapshotStorage>,
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", self.config.base_url())
            .field("timeout", self.config.timeout())
            .finish_non_exhaustive()
    }
}

impl UpstreamClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed (for example
    /// when no TLS backend is available).
    #[instrument(skip_all, fields(base_url = %config.base_url()))]
    pub fn new(config: UpstreamConfig, snapshots: Arc<dyn SnapshotStorage>) -> LoadoutResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(*config.timeout())
            .gzip(true)
            .build()
            .map_err(|e| {
                UpstreamError::new(UpstreamErrorKind::Transport(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        if config.api_key().is_empty() {
            tracing::warn!("No API key configured, requests will be sent unauthenticated");
        }
        tracing::debug!("Creating upstream client");

        Ok(Self {
            config,
            client,
            snapshots,
        })
    }

    /// Connection settings.
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Full cosmetics listing for `language`, falling back to its snapshot.
    ///
    /// A live body without a `data` array counts as a failed fetch and is
    /// never persisted.
    ///
    /// # Errors
    ///
    /// Returns the live error if the API failed and no usable snapshot exists.
    #[instrument(skip(self))]
    pub async fn fetch_cosmetics(
        &self,
        language: &str,
    ) -> LoadoutResult<Fetched<Vec<CosmeticItem>>> {
        self.fetch_with_fallback(
            COSMETICS_ENDPOINT,
            &[("language", language)],
            SnapshotKey::Cosmetics(language.to_string()),
            parse_cosmetics,
        )
        .await
    }

    /// Playlist listing for `language`, falling back to its snapshot.
    ///
    /// # Errors
    ///
    /// Returns the live error if the API failed and no usable snapshot exists.
    #[instrument(skip(self))]
    pub async fn fetch_playlists(&self, language: &str) -> LoadoutResult<Fetched<Vec<Playlist>>> {
        self.fetch_with_fallback(
            PLAYLISTS_ENDPOINT,
            &[("language", language)],
            SnapshotKey::Playlists(language.to_string()),
            parse_playlists,
        )
        .await
    }

    /// Current new-items feed. No fallback.
    #[instrument(skip(self))]
    pub async fn fetch_new_items(&self, language: &str) -> LoadoutResult<NewItemsFeed> {
        let payload = self
            .get_json(NEW_COSMETICS_ENDPOINT, &[("language", language)])
            .await?;
        NewItemsFeed::from_payload(payload)
    }

    /// Game news envelope.
    #[instrument(skip(self))]
    pub async fn fetch_news(&self, language: &str) -> LoadoutResult<JsonValue> {
        Ok(self.get_json(NEWS_ENDPOINT, &[("language", language)]).await?)
    }

    /// Current AES keys envelope.
    #[instrument(skip(self))]
    pub async fn fetch_aes_key(&self, format: AesKeyFormat) -> LoadoutResult<JsonValue> {
        Ok(self
            .get_json(AES_ENDPOINT, &[("keyFormat", format.as_ref())])
            .await?)
    }

    /// Battle royale stats for a player, with the stats image attached.
    #[instrument(skip(self))]
    pub async fn fetch_player_stats(
        &self,
        name: &str,
        account_type: AccountType,
    ) -> LoadoutResult<JsonValue> {
        Ok(self
            .get_json(
                STATS_ENDPOINT,
                &[
                    ("name", name),
                    ("accountType", account_type.as_ref()),
                    ("image", "all"),
                ],
            )
            .await?)
    }

    /// Creator code lookup.
    #[instrument(skip(self))]
    pub async fn fetch_creator_code(&self, code: &str) -> LoadoutResult<JsonValue> {
        Ok(self
            .get_json(CREATOR_CODE_ENDPOINT, &[("name", code)])
            .await?)
    }

    /// Live fetch that persists only payloads `parse` accepts, and reads `key`
    /// on any failure.
    async fn fetch_with_fallback<T>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        key: SnapshotKey,
        parse: fn(&JsonValue) -> LoadoutResult<T>,
    ) -> LoadoutResult<Fetched<T>> {
        let live = match self.get_json(endpoint, query).await {
            Ok(payload) => parse(&payload).map(|parsed| (payload, parsed)),
            Err(e) => Err(LoadoutError::from(e)),
        };

        let live_error = match live {
            Ok((payload, parsed)) => {
                if let Err(e) = self.snapshots.save(&key, &payload).await {
                    tracing::warn!(snapshot = %key, error = %e, "Failed to persist snapshot");
                }
                return Ok(Fetched::new(parsed, FetchSource::Live));
            }
            Err(e) => e,
        };

        tracing::warn!(
            endpoint,
            snapshot = %key,
            error = %live_error,
            "Upstream fetch failed, using snapshot"
        );

        match self.snapshots.load(&key).await {
            Ok(Some(payload)) => match parse(&payload) {
                Ok(parsed) => Ok(Fetched::new(parsed, FetchSource::Snapshot)),
                Err(e) => {
                    tracing::error!(snapshot = %key, error = %e, "Snapshot malformed");
                    Err(live_error)
                }
            },
            Ok(None) => {
                tracing::error!(snapshot = %key, "No snapshot to fall back to");
                Err(live_error)
            }
            Err(e) => {
                tracing::error!(snapshot = %key, error = %e, "Snapshot unreadable");
                Err(live_error)
            }
        }
    }

    /// GET an endpoint and decode its JSON body.
    async fn get_json(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<JsonValue, UpstreamError> {
        let url = self.config.url(endpoint);
        tracing::debug!(url = %url, "Sending upstream request");

        let mut request = self.client.get(&url).query(query);
        if !self.config.api_key().is_empty() {
            request = request.header(reqwest::header::AUTHORIZATION, self.config.api_key());
        }

        let response = request.send().await.map_err(|e| {
            UpstreamError::new(UpstreamErrorKind::Transport(format!("{}: {}", endpoint, e)))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::new(UpstreamErrorKind::Unavailable {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }));
        }

        response.json().await.map_err(|e| {
            UpstreamError::new(UpstreamErrorKind::Parse(format!("{}: {}", endpoint, e)))
        })
    }
}
