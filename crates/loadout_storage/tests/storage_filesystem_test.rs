//! Tests for filesystem snapshots.

use loadout_error::{LoadoutErrorKind, StorageErrorKind};
use loadout_storage::{FileSystemSnapshots, SnapshotKey, SnapshotStorage};
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let snapshots = FileSystemSnapshots::new(temp_dir.path()).unwrap();
    let key = SnapshotKey::Cosmetics("en".to_string());
    let payload = json!({"status": 200, "data": [{"id": "CID_028_Athena_Commando_F"}]});

    snapshots.save(&key, &payload).await.unwrap();

    assert!(temp_dir.path().join("cosmetics/all_en.json").exists());
    assert_eq!(snapshots.load(&key).await.unwrap(), Some(payload));
}

#[tokio::test]
async fn test_missing_snapshot_is_none() {
    let temp_dir = TempDir::new().unwrap();
    let snapshots = FileSystemSnapshots::new(temp_dir.path()).unwrap();

    assert_eq!(snapshots.load(&SnapshotKey::NewItems).await.unwrap(), None);
    assert!(!snapshots.exists(&SnapshotKey::NewItems).await.unwrap());
}

#[tokio::test]
async fn test_save_overwrites_wholesale() {
    let temp_dir = TempDir::new().unwrap();
    let snapshots = FileSystemSnapshots::new(temp_dir.path()).unwrap();
    let key = SnapshotKey::Playlists("fr".to_string());

    snapshots
        .save(&key, &json!({"data": [{"id": "a"}, {"id": "b"}]}))
        .await
        .unwrap();
    snapshots.save(&key, &json!({"data": []})).await.unwrap();

    assert_eq!(snapshots.load(&key).await.unwrap(), Some(json!({"data": []})));
    assert!(!temp_dir.path().join("playlists/fr.json.tmp").exists());
}

#[tokio::test]
async fn test_corrupt_snapshot_is_storage_error() {
    let temp_dir = TempDir::new().unwrap();
    let snapshots = FileSystemSnapshots::new(temp_dir.path()).unwrap();
    std::fs::write(temp_dir.path().join("new_cosmetics.json"), b"{not json").unwrap();

    let result = snapshots.load(&SnapshotKey::NewItems).await;

    assert!(matches!(
        result.unwrap_err().kind(),
        LoadoutErrorKind::Storage(_)
    ));
}

#[tokio::test]
async fn test_languages_are_separate_documents() {
    let temp_dir = TempDir::new().unwrap();
    let snapshots = FileSystemSnapshots::new(temp_dir.path()).unwrap();

    snapshots
        .save(&SnapshotKey::Cosmetics("en".into()), &json!({"data": ["en"]}))
        .await
        .unwrap();

    assert!(snapshots.exists(&SnapshotKey::Cosmetics("en".into())).await.unwrap());
    assert!(!snapshots.exists(&SnapshotKey::Cosmetics("de".into())).await.unwrap());
}

#[tokio::test]
async fn test_exists_reports_io_errors() {
    let temp_dir = TempDir::new().unwrap();
    let snapshots = FileSystemSnapshots::new(temp_dir.path()).unwrap();
    // A regular file where the cosmetics directory should be.
    std::fs::write(temp_dir.path().join("cosmetics"), b"not a directory").unwrap();

    let err = snapshots
        .exists(&SnapshotKey::Cosmetics("en".to_string()))
        .await
        .unwrap_err();

    match err.kind() {
        LoadoutErrorKind::Storage(storage) => {
            assert!(matches!(storage.kind, StorageErrorKind::FileRead(_)));
        }
        other => panic!("expected storage error, got {}", other),
    }
}
