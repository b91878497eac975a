//! Dispatcher fan-out tests with a recording webhook sender.

use loadout_core::{
    CosmeticItem, CosmeticType, GuildId, GuildNotificationConfig, GuildRecord,
    NotificationCategory, Rarity,
};
use loadout_error::{DeliveryError, DeliveryErrorKind};
use loadout_social::{
    Dispatcher, Embed, InMemoryGuildStore, WebhookPayload, WebhookSender, cosmetic_card,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Records every POST and fails those aimed at `failing` URLs.
#[derive(Default)]
struct RecordingSender {
    posts: Mutex<Vec<(String, WebhookPayload)>>,
    failing: HashSet<String>,
}

impl RecordingSender {
    fn failing_for(url: &str) -> Self {
        Self {
            failing: HashSet::from([url.to_string()]),
            ..Self::default()
        }
    }

    fn posts_to(&self, url: &str) -> Vec<WebhookPayload> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .filter(|(target, _)| target == url)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl WebhookSender for RecordingSender {
    async fn post(&self, url: &str, payload: &WebhookPayload) -> Result<(), DeliveryError> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        if self.failing.contains(url) {
            Err(DeliveryError::new(DeliveryErrorKind::Status(500)))
        } else {
            Ok(())
        }
    }
}

const URL_A: &str = "https://discord.com/api/webhooks/1/a";
const URL_B: &str = "https://discord.com/api/webhooks/2/b";

fn cards(count: usize) -> Vec<Embed> {
    (0..count)
        .map(|i| {
            let item = CosmeticItem::builder()
                .id(format!("CID_{i:03}"))
                .name(format!("Item {i}"))
                .cosmetic_type(CosmeticType::Outfit)
                .rarity(Rarity::new("rare", "Rare"))
                .build()
                .unwrap();
            cosmetic_card(&item)
        })
        .collect()
}

fn guild(id: u64, config: GuildNotificationConfig) -> GuildRecord {
    GuildRecord::new(GuildId(id)).with_notifications(config)
}

#[tokio::test]
async fn test_pages_delivered_in_order_with_title_and_footer() {
    let store = Arc::new(InMemoryGuildStore::with_records([guild(
        1,
        GuildNotificationConfig::enabled_for(URL_A),
    )]));
    let sender = Arc::new(RecordingSender::default());
    let dispatcher = Dispatcher::new(store, sender.clone());

    let report = dispatcher
        .send(cards(23), NotificationCategory::Cosmetics)
        .await
        .unwrap();

    assert_eq!(*report.pages(), 3);
    assert_eq!(*report.delivered_pages(), 3);
    assert!(report.is_complete());

    let posts = sender.posts_to(URL_A);
    let sizes: Vec<_> = posts.iter().map(|payload| payload.embeds().len()).collect();
    assert_eq!(sizes, vec![10, 10, 3]);
    assert!(posts[0].embeds()[0].title().is_some());
    assert!(posts[2].embeds()[2].footer().is_some());
    assert_eq!(posts[1].embeds()[0].fields()[0].value(), "`CID_010`");
}

#[tokio::test]
async fn test_failing_guild_does_not_block_others() {
    let store = Arc::new(InMemoryGuildStore::with_records([
        guild(1, GuildNotificationConfig::enabled_for(URL_A)),
        guild(2, GuildNotificationConfig::enabled_for(URL_B)),
    ]));
    let sender = Arc::new(RecordingSender::failing_for(URL_A));
    let dispatcher = Dispatcher::new(store, sender.clone());

    let report = dispatcher
        .send(cards(12), NotificationCategory::Cosmetics)
        .await
        .unwrap();

    assert_eq!(*report.targeted(), 2);
    assert_eq!(*report.delivered_pages(), 2);
    assert_eq!(*report.failed_pages(), 2);
    assert_eq!(report.failed_guilds(), &vec![GuildId(1)]);

    // Both pages were still attempted for the failing guild.
    assert_eq!(sender.posts_to(URL_A).len(), 2);
    assert_eq!(sender.posts_to(URL_B).len(), 2);
}

#[tokio::test]
async fn test_category_gating_and_missing_destination() {
    let mut no_url = GuildNotificationConfig::enabled_for(URL_B);
    no_url.set_destination_url(None);

    let store = Arc::new(InMemoryGuildStore::with_records([
        guild(
            1,
            GuildNotificationConfig::enabled_for(URL_A)
                .with_category(NotificationCategory::Cosmetics, false),
        ),
        guild(2, no_url),
        guild(3, GuildNotificationConfig::default()),
    ]));
    let sender = Arc::new(RecordingSender::default());
    let dispatcher = Dispatcher::new(store, sender.clone());

    let report = dispatcher
        .send(cards(1), NotificationCategory::Cosmetics)
        .await
        .unwrap();

    assert_eq!(*report.targeted(), 0);
    assert_eq!(*report.skipped(), 2);
    assert!(sender.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_toggle_counts_as_enabled() {
    let config: GuildNotificationConfig = serde_json::from_value(serde_json::json!({
        "enabled": true,
        "destination_url": URL_A,
        "category_toggle": {"news": false}
    }))
    .unwrap();
    let store = Arc::new(InMemoryGuildStore::with_records([guild(1, config)]));
    let sender = Arc::new(RecordingSender::default());
    let dispatcher = Dispatcher::new(store, sender.clone());

    let report = dispatcher
        .send(cards(1), NotificationCategory::Cosmetics)
        .await
        .unwrap();

    assert_eq!(*report.targeted(), 1);
    assert_eq!(sender.posts_to(URL_A).len(), 1);
}

#[tokio::test]
async fn test_empty_notifications_send_nothing() {
    let store = Arc::new(InMemoryGuildStore::with_records([guild(
        1,
        GuildNotificationConfig::enabled_for(URL_A),
    )]));
    let sender = Arc::new(RecordingSender::default());
    let dispatcher = Dispatcher::new(store, sender.clone()).with_max_concurrent(0);

    let report = dispatcher
        .send(Vec::new(), NotificationCategory::Cosmetics)
        .await
        .unwrap();

    assert_eq!(*report.targeted(), 0);
    assert!(sender.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_many_guilds_with_small_concurrency_limit() {
    let records: Vec<_> = (0..40)
        .map(|i| {
            guild(
                i,
                GuildNotificationConfig::enabled_for(format!("https://discord.com/api/webhooks/{i}/x")),
            )
        })
        .collect();
    let store = Arc::new(InMemoryGuildStore::with_records(records));
    let sender = Arc::new(RecordingSender::default());
    let dispatcher = Dispatcher::new(store, sender.clone()).with_max_concurrent(3);

    let report = dispatcher
        .send(cards(15), NotificationCategory::Cosmetics)
        .await
        .unwrap();

    assert_eq!(*report.targeted(), 40);
    assert_eq!(*report.delivered_pages(), 80);
    assert_eq!(sender.posts.lock().unwrap().len(), 80);
}
