//! New-item detection and announcement.

use crate::AppContext;
use loadout_core::{CosmeticItem, NotificationCategory};
use loadout_error::{LoadoutError, LoadoutErrorKind, LoadoutResult};
use loadout_social::{DispatchReport, cosmetic_card};
use loadout_storage::SnapshotKey;
use loadout_upstream::NewItemsFeed;
use std::sync::Arc;
use tracing::instrument;

/// What one diff cycle did.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOutcome {
    /// Feed hash matched the baseline; nothing sent, nothing written
    Unchanged,
    /// No baseline, or a malformed one; the feed became the baseline unannounced
    Seeded,
    /// Feed hash changed
    Changed {
        /// Feed items absent from the baseline, in feed order
        new_items: Vec<CosmeticItem>,
        /// Dispatch result, `None` when there was nothing to send or the
        /// guild store could not be queried
        dispatch: Option<DispatchReport>,
    },
}

/// Compares the new-items feed with the persisted baseline and announces
/// what appeared.
///
/// The baseline is replaced whenever the feed hash differs, whether or not
/// any item was new and whether or not delivery succeeded.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    context: Arc<AppContext>,
}

impl DiffEngine {
    /// Create a diff engine over `context`.
    pub fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    /// Run one diff cycle.
    ///
    /// # Errors
    ///
    /// Returns error if the feed cannot be fetched or the baseline cannot be
    /// read (nothing is announced or written this cycle), or if the seed
    /// baseline cannot be written.
    #[instrument(skip(self), fields(language = %self.context.diff_language()))]
    pub async fn run_once(&self) -> LoadoutResult<DiffOutcome> {
        let upstream = self.context.upstream().await?;
        let feed = upstream.fetch_new_items(self.context.diff_language()).await?;

        let Some(baseline) = self.load_baseline().await? else {
            tracing::info!(hash = %feed.snapshot().hash(), "No baseline yet, seeding without announcing");
            self.context
                .snapshots()
                .save(&SnapshotKey::NewItems, feed.raw())
                .await?;
            return Ok(DiffOutcome::Seeded);
        };

        if feed.snapshot().hash() == baseline.snapshot().hash() {
            tracing::debug!("No cosmetic changes detected");
            return Ok(DiffOutcome::Unchanged);
        }

        let new_items = feed.snapshot().added_since(baseline.snapshot());
        tracing::info!(
            previous = %baseline.snapshot().hash(),
            current = %feed.snapshot().hash(),
            new_items = new_items.len(),
            "New items feed changed"
        );

        let dispatch = if new_items.is_empty() {
            None
        } else {
            let cards = new_items.iter().map(cosmetic_card).collect();
            match self
                .context
                .dispatcher()
                .send(cards, NotificationCategory::Cosmetics)
                .await
            {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::error!(error = %e, "Could not dispatch new cosmetics");
                    None
                }
            }
        };

        if let Err(e) = self
            .context
            .snapshots()
            .save(&SnapshotKey::NewItems, feed.raw())
            .await
        {
            tracing::error!(error = %e, "Failed to persist new items baseline, next cycle will retry");
        }

        Ok(DiffOutcome::Changed {
            new_items,
            dispatch,
        })
    }

    /// Persisted baseline, or `None` if missing or malformed.
    ///
    /// Read failures propagate so the existing baseline is kept.
    async fn load_baseline(&self) -> LoadoutResult<Option<NewItemsFeed>> {
        let raw = match self.context.snapshots().load(&SnapshotKey::NewItems).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(e) if is_malformed(&e) => {
                tracing::warn!(error = %e, "Baseline is not valid JSON, reseeding");
                return Ok(None);
            }
            Err(e) => {
                tracing::error!(error = %e, "Baseline unreadable, skipping cycle");
                return Err(e);
            }
        };

        match NewItemsFeed::from_payload(raw) {
            Ok(baseline) => Ok(Some(baseline)),
            Err(e) => {
                tracing::warn!(error = %e, "Baseline malformed, reseeding");
                Ok(None)
            }
        }
    }
}

fn is_malformed(error: &LoadoutError) -> bool {
    matches!(error.kind(), LoadoutErrorKind::Storage(storage) if storage.is_malformed())
}
