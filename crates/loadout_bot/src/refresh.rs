//! Catalog refresh cycle.

use crate::AppContext;
use loadout_catalog::Catalog;
use loadout_error::LoadoutResult;
use loadout_upstream::FetchSource;
use std::sync::Arc;
use tracing::instrument;

/// Result of refreshing one resource for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOutcome {
    /// Fetched, parsed and merged into the catalog
    Refreshed {
        /// Entries parsed from the payload
        parsed: usize,
        /// Entries not already in the catalog
        added: usize,
        /// Live response or snapshot fallback
        source: FetchSource,
    },
    /// Nothing merged; the catalog kept its previous contents
    Failed {
        /// Why
        error: String,
    },
}

impl ResourceOutcome {
    /// Whether the resource was refreshed.
    pub fn is_refreshed(&self) -> bool {
        matches!(self, ResourceOutcome::Refreshed { .. })
    }
}

/// Per-language part of a [`RefreshReport`].
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct LanguageRefresh {
    /// Language code
    language: String,
    /// Cosmetics outcome
    cosmetics: ResourceOutcome,
    /// Playlists outcome
    playlists: ResourceOutcome,
}

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct RefreshReport {
    /// One entry per configured language, in configuration order
    languages: Vec<LanguageRefresh>,
}

impl RefreshReport {
    /// True when every resource of every language refreshed.
    pub fn is_success(&self) -> bool {
        self.languages
            .iter()
            .all(|entry| entry.cosmetics.is_refreshed() && entry.playlists.is_refreshed())
    }

    /// Outcome for one language.
    pub fn language(&self, language: &str) -> Option<&LanguageRefresh> {
        self.languages.iter().find(|entry| entry.language == language)
    }
}

/// Keeps every configured catalog up to date with the upstream listings.
///
/// Each language and each resource is refreshed independently: a failure
/// is logged and recorded in the report, and the rest carries on.
#[derive(Debug, Clone)]
pub struct RefreshLoop {
    context: Arc<AppContext>,
}

impl RefreshLoop {
    /// Create a refresh loop over `context`.
    pub fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    /// Run one refresh cycle.
    #[instrument(skip(self), fields(languages = self.context.languages().len()))]
    pub async fn run_once(&self) -> RefreshReport {
        let mut report = RefreshReport::default();

        for language in self.context.languages() {
            let catalog = self.context.catalog(language);
            let cosmetics = outcome(language, "cosmetics", self.refresh_cosmetics(&catalog).await);
            let playlists = outcome(language, "playlists", self.refresh_playlists(&catalog).await);
            report.languages.push(LanguageRefresh {
                language: language.clone(),
                cosmetics,
                playlists,
            });
        }

        tracing::info!(success = report.is_success(), "Refresh cycle finished");
        report
    }

    async fn refresh_cosmetics(&self, catalog: &Catalog) -> LoadoutResult<ResourceOutcome> {
        let upstream = self.context.upstream().await?;
        let fetched = upstream.fetch_cosmetics(catalog.language()).await?;
        let source = *fetched.source();
        let items = fetched.into_payload();

        let parsed = items.len();
        let added = catalog.add_cosmetics(items);
        catalog.mark_cosmetics_loaded();

        Ok(ResourceOutcome::Refreshed {
            parsed,
            added,
            source,
        })
    }

    async fn refresh_playlists(&self, catalog: &Catalog) -> LoadoutResult<ResourceOutcome> {
        let upstream = self.context.upstream().await?;
        let fetched = upstream.fetch_playlists(catalog.language()).await?;
        let source = *fetched.source();
        let playlists = fetched.into_payload();

        let parsed = playlists.len();
        let added = catalog.add_playlists(playlists);
        catalog.mark_playlists_loaded();

        Ok(ResourceOutcome::Refreshed {
            parsed,
            added,
            source,
        })
    }
}

fn outcome(language: &str, resource: &str, result: LoadoutResult<ResourceOutcome>) -> ResourceOutcome {
    match result {
        Ok(outcome) => {
            if let ResourceOutcome::Refreshed { parsed, added, source } = &outcome {
                tracing::debug!(language, resource, parsed, added, source = %source, "Resource refreshed");
            }
            outcome
        }
        Err(e) => {
            tracing::error!(language, resource, error = %e, "Refresh failed, keeping previous catalog");
            ResourceOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}
