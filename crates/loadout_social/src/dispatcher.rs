//! Fan-out of notification pages to subscribed guilds.

use crate::{Embed, GuildStore, WebhookPayload, WebhookSender, paginate};
use futures::stream::{self, StreamExt};
use loadout_core::{GuildId, NotificationCategory};
use loadout_error::LoadoutResult;
use std::sync::Arc;
use tracing::instrument;

/// Guilds delivered to at the same time unless configured otherwise.
pub const DEFAULT_MAX_CONCURRENT_DELIVERIES: usize = 16;

/// Outcome of one [`Dispatcher::send`].
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct DispatchReport {
    /// Pages each targeted guild was sent
    pages: usize,
    /// Guilds that had a destination and the category enabled
    targeted: usize,
    /// Enabled guilds skipped for a disabled category or missing URL
    skipped: usize,
    /// Pages accepted by their destination
    delivered_pages: usize,
    /// Pages that failed
    failed_pages: usize,
    /// Guilds with at least one failed page, ascending
    failed_guilds: Vec<GuildId>,
}

impl DispatchReport {
    /// True when every page reached every targeted guild.
    pub fn is_complete(&self) -> bool {
        self.failed_pages == 0
    }
}

struct GuildOutcome {
    guild_id: GuildId,
    delivered: usize,
    failed: usize,
}

/// Delivers notification cards to every guild subscribed to a category.
///
/// Each `(guild, page)` POST is attempted once. A failure is logged and
/// counted but never stops delivery to other guilds or of later pages.
/// Pages go to a guild one after another; guilds are served concurrently,
/// at most `max_concurrent` at a time.
#[derive(Clone)]
pub struct Dispatcher {
    guilds: Arc<dyn GuildStore>,
    sender: Arc<dyn WebhookSender>,
    max_concurrent: usize,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("max_concurrent", &self.max_concurrent)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher with the default concurrency limit.
    pub fn new(guilds: Arc<dyn GuildStore>, sender: Arc<dyn WebhookSender>) -> Self {
        Self {
            guilds,
            sender,
            max_concurrent: DEFAULT_MAX_CONCURRENT_DELIVERIES,
        }
    }

    /// Limit how many guilds are delivered to at once (minimum 1).
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Guild store this dispatcher reads from.
    pub fn guilds(&self) -> &Arc<dyn GuildStore> {
        &self.guilds
    }

    /// Paginate `notifications` and deliver them to every subscribed guild.
    ///
    /// # Errors
    ///
    /// Returns error only if the guild store cannot be queried. Delivery
    /// failures are reported in the [`DispatchReport`].
    #[instrument(skip(self, notifications), fields(category = %category, cards = notifications.len()))]
    pub async fn send(
        &self,
        notifications: Vec<Embed>,
        category: NotificationCategory,
    ) -> LoadoutResult<DispatchReport> {
        let pages = paginate(notifications, category);
        if pages.is_empty() {
            tracing::debug!("Nothing to dispatch");
            return Ok(DispatchReport::default());
        }

        let mut report = DispatchReport {
            pages: pages.len(),
            ..DispatchReport::default()
        };

        let mut targets = Vec::new();
        for guild in self.guilds.find_enabled().await? {
            let notifications = guild.notifications();
            if !notifications.is_category_enabled(category) {
                tracing::debug!(guild_id = %guild.guild_id(), "Category disabled, skipping guild");
                report.skipped += 1;
                continue;
            }
            let Some(url) = notifications.destination_url().clone() else {
                tracing::debug!(guild_id = %guild.guild_id(), "No destination configured, skipping guild");
                report.skipped += 1;
                continue;
            };
            targets.push((*guild.guild_id(), url));
        }
        report.targeted = targets.len();

        let payloads: Arc<Vec<WebhookPayload>> =
            Arc::new(pages.into_iter().map(WebhookPayload::new).collect());

        let outcomes: Vec<GuildOutcome> = stream::iter(targets)
            .map(|(guild_id, url)| {
                let payloads = Arc::clone(&payloads);
                async move { self.deliver(guild_id, &url, &payloads).await }
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        for outcome in outcomes {
            report.delivered_pages += outcome.delivered;
            report.failed_pages += outcome.failed;
            if outcome.failed > 0 {
                report.failed_guilds.push(outcome.guild_id);
            }
        }
        report.failed_guilds.sort();

        tracing::info!(
            targeted = report.targeted,
            skipped = report.skipped,
            delivered_pages = report.delivered_pages,
            failed_pages = report.failed_pages,
            "Dispatch finished"
        );
        Ok(report)
    }

    /// Send every page to one guild, in order.
    async fn deliver(&self, guild_id: GuildId, url: &str, payloads: &[WebhookPayload]) -> GuildOutcome {
        let mut outcome = GuildOutcome {
            guild_id,
            delivered: 0,
            failed: 0,
        };

        for (page, payload) in payloads.iter().enumerate() {
            match self.sender.post(url, payload).await {
                Ok(()) => outcome.delivered += 1,
                Err(e) => {
                    tracing::error!(guild_id = %guild_id, page, error = %e, "Webhook delivery failed");
                    outcome.failed += 1;
                }
            }
        }

        tracing::debug!(guild_id = %guild_id, delivered = outcome.delivered, "Guild delivery finished");
        outcome
    }
}
