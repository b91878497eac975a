//! Tests for catalog dedup, queries and readiness.

use loadout_catalog::{Catalog, CatalogRegistry, MatchMode, is_cosmetic_id};
use loadout_core::{CosmeticItem, CosmeticType, Playlist, Rarity};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn cosmetic(id: &str, name: &str, cosmetic_type: CosmeticType) -> CosmeticItem {
    CosmeticItem::builder()
        .id(id)
        .name(name)
        .cosmetic_type(cosmetic_type)
        .rarity(Rarity::new("rare", "Rare"))
        .build()
        .unwrap()
}

fn seeded_catalog() -> Catalog {
    let catalog = Catalog::new("en");
    catalog.add_cosmetic(cosmetic("CID_001_Athena_Commando_F_Default", "Recruit", CosmeticType::Outfit));
    catalog.add_cosmetic(cosmetic("CID_028_Athena_Commando_F", "Renegade Raider", CosmeticType::Outfit));
    catalog.add_cosmetic(cosmetic("EID_Floss", "Floss", CosmeticType::Emote));
    catalog.add_cosmetic(cosmetic("Pickaxe_ID_011_Medieval", "Axecalibur", CosmeticType::Pickaxe));
    catalog.add_cosmetic(cosmetic("BID_004_BlackKnight", "Royal Shield", CosmeticType::Backpack));
    catalog.add_cosmetic(cosmetic("MusicPack_001_Floss", "Floss Music", CosmeticType::Other));
    catalog.mark_cosmetics_loaded();
    catalog
}

#[test]
fn test_adding_same_item_twice_keeps_length() {
    let catalog = Catalog::new("en");
    let item = cosmetic("CID_028_Athena_Commando_F", "Renegade Raider", CosmeticType::Outfit);

    assert!(catalog.add_cosmetic(item.clone()));
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.bucket_len(CosmeticType::Outfit), 1);

    assert!(!catalog.add_cosmetic(item));
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.bucket_len(CosmeticType::Outfit), 1);
}

#[test]
fn test_same_id_with_different_payload_is_kept() {
    let catalog = Catalog::new("en");
    let original = CosmeticItem::builder()
        .id("CID_028_Athena_Commando_F")
        .name("Renegade Raider")
        .cosmetic_type(CosmeticType::Outfit)
        .rarity(Rarity::new("rare", "Rare"))
        .raw(json!({"id": "CID_028_Athena_Commando_F", "shopHistory": []}))
        .build()
        .unwrap();
    let reissued = CosmeticItem::builder()
        .id("CID_028_Athena_Commando_F")
        .name("Renegade Raider")
        .cosmetic_type(CosmeticType::Outfit)
        .rarity(Rarity::new("rare", "Rare"))
        .raw(json!({"id": "CID_028_Athena_Commando_F", "shopHistory": ["2024-01-01"]}))
        .build()
        .unwrap();

    assert!(catalog.add_cosmetic(original));
    assert!(catalog.add_cosmetic(reissued));
    assert_eq!(catalog.len(), 2);
}

#[test]
fn test_other_type_only_lands_in_all_bucket() {
    let catalog = seeded_catalog();

    assert_eq!(catalog.len(), 6);
    assert_eq!(catalog.bucket_len(CosmeticType::Other), 0);
    assert_eq!(catalog.bucket_len(CosmeticType::Outfit), 2);
    assert_eq!(catalog.cosmetics_of(CosmeticType::Emote).len(), 1);
}

#[test]
fn test_add_cosmetics_counts_new_items() {
    let catalog = Catalog::new("en");
    let items = vec![
        cosmetic("CID_A", "A", CosmeticType::Outfit),
        cosmetic("CID_B", "B", CosmeticType::Outfit),
        cosmetic("CID_A", "A", CosmeticType::Outfit),
    ];

    assert_eq!(catalog.add_cosmetics(items), 2);
}

#[test]
fn test_id_prefix_query_matches_ids() {
    let catalog = seeded_catalog();

    let hits = catalog.query("cid_", None, MatchMode::Prefix);
    let ids: Vec<_> = hits.iter().map(|item| item.id().as_str()).collect();

    assert_eq!(
        ids,
        vec!["CID_001_Athena_Commando_F_Default", "CID_028_Athena_Commando_F"]
    );
}

#[test]
fn test_name_substring_query_matches_names() {
    let catalog = seeded_catalog();

    let hits = catalog.query("renegade", None, MatchMode::Substring);

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name(), "Renegade Raider");
}

#[test]
fn test_prefix_mode_does_not_match_inner_text() {
    let catalog = seeded_catalog();

    assert!(catalog.query("raider", None, MatchMode::Prefix).is_empty());
    assert_eq!(catalog.query("raider", None, MatchMode::Substring).len(), 1);
}

#[test]
fn test_query_restricted_to_categories_in_given_order() {
    let catalog = seeded_catalog();

    let hits = catalog.query(
        "floss",
        Some(&[CosmeticType::Emote, CosmeticType::Outfit]),
        MatchMode::Substring,
    );
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id(), "EID_Floss");

    // Music packs are not bucketed, so they only show up in unrestricted searches.
    let unrestricted = catalog.query("floss", None, MatchMode::Substring);
    assert_eq!(unrestricted.len(), 2);
    let other_only = catalog.query("floss", Some(&[CosmeticType::Other]), MatchMode::Substring);
    assert!(other_only.is_empty());
}

#[test]
fn test_query_on_empty_catalog_is_empty() {
    let catalog = Catalog::new("en");
    assert!(catalog.query("cid_", None, MatchMode::Prefix).is_empty());
}

#[test]
fn test_query_is_empty_until_marked_loaded() {
    let catalog = Catalog::new("en");
    catalog.add_cosmetic(cosmetic("CID_028_Athena_Commando_F", "Renegade Raider", CosmeticType::Outfit));
    catalog.add_playlist(Playlist::new("Playlist_DefaultSolo", Some("Solo".into()), None));

    assert_eq!(catalog.len(), 1);
    assert!(catalog.query("cid_", None, MatchMode::Prefix).is_empty());
    assert!(catalog.query_playlists("solo", MatchMode::Substring).is_empty());

    catalog.mark_cosmetics_loaded();
    catalog.mark_playlists_loaded();

    assert_eq!(catalog.query("cid_", None, MatchMode::Prefix).len(), 1);
    assert_eq!(catalog.query_playlists("solo", MatchMode::Substring).len(), 1);
}

#[test]
fn test_is_cosmetic_id() {
    assert!(is_cosmetic_id("CID_028"));
    assert!(is_cosmetic_id("bannertoken_001"));
    assert!(is_cosmetic_id("Glider_ID_001"));
    assert!(!is_cosmetic_id("renegade"));
    assert!(!is_cosmetic_id("playlist_defaultsolo"));
}

#[test]
fn test_playlist_dedup_and_query() {
    let catalog = Catalog::new("en");
    let solo = Playlist::new("Playlist_DefaultSolo", Some("Solo".into()), None);
    let squads = Playlist::new(
        "Playlist_DefaultSquad",
        Some("Squads".into()),
        Some("Battle Royale".into()),
    );
    let unnamed = Playlist::new("Playlist_Creative_Hub", None, None);

    assert!(catalog.add_playlist(solo.clone()));
    assert!(!catalog.add_playlist(solo));
    assert_eq!(catalog.add_playlists(vec![squads, unnamed]), 2);
    assert_eq!(catalog.playlist_len(), 3);
    catalog.mark_playlists_loaded();

    let by_id = catalog.query_playlists("playlist_default", MatchMode::Prefix);
    assert_eq!(by_id.len(), 2);

    let by_sub_name = catalog.query_playlists("battle royale", MatchMode::Substring);
    assert_eq!(by_sub_name.len(), 1);
    assert_eq!(by_sub_name[0].id(), "Playlist_DefaultSquad");

    let by_stripped_id = catalog.query_playlists("creative", MatchMode::Prefix);
    assert_eq!(by_stripped_id.len(), 1);
    assert_eq!(by_stripped_id[0].id(), "Playlist_Creative_Hub");
}

#[tokio::test]
async fn test_wait_until_loaded_resolves_after_mark() {
    let catalog = Arc::new(Catalog::new("en"));
    assert!(!catalog.is_cosmetics_loaded());

    let waiter = {
        let catalog = Arc::clone(&catalog);
        tokio::spawn(async move { catalog.wait_until_loaded().await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished());

    catalog.mark_cosmetics_loaded();
    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter should wake")
        .unwrap();
    assert!(catalog.is_cosmetics_loaded());
}

#[tokio::test]
async fn test_wait_returns_immediately_once_loaded() {
    let catalog = Catalog::new("en");
    catalog.mark_playlists_loaded();
    catalog.mark_playlists_loaded();

    tokio::time::timeout(Duration::from_millis(100), catalog.wait_until_playlists_loaded())
        .await
        .expect("already loaded");
    assert!(!catalog.is_cosmetics_loaded());
}

#[test]
fn test_registry_creates_catalog_per_language() {
    let registry = CatalogRegistry::new();
    let en = registry.get_or_create("en");
    let fr = registry.get_or_create("fr");

    en.add_cosmetic(cosmetic("CID_A", "A", CosmeticType::Outfit));

    assert_eq!(en.language(), "en");
    assert_eq!(fr.len(), 0);
    assert_eq!(registry.languages(), vec!["en".to_string(), "fr".to_string()]);
    assert_eq!(registry.get("en").unwrap().len(), 1);
}
