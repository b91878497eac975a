//! Snapshot persistence for Loadout.
//!
//! Every upstream payload that the bot must survive an outage with is kept
//! as a whole JSON document, overwritten wholesale and never patched:
//!
//! - `cosmetics/all_<lang>.json`: last cosmetics listing per language
//! - `playlists/<lang>.json`: last playlists listing per language
//! - `new_cosmetics.json`: baseline of the new-items feed
//!
//! # Example
//!
//! ```rust
//! use loadout_storage::{FileSystemSnapshots, SnapshotKey, SnapshotStorage};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let snapshots = FileSystemSnapshots::new("/tmp/loadout-cache")?;
//! let key = SnapshotKey::Cosmetics("en".to_string());
//!
//! snapshots.save(&key, &json!({"data": []})).await?;
//! assert_eq!(snapshots.load(&key).await?, Some(json!({"data": []})));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

use loadout_error::LoadoutResult;
use serde_json::Value as JsonValue;
use std::path::PathBuf;

mod filesystem;
mod memory;

pub use filesystem::FileSystemSnapshots;
pub use loadout_error::{StorageError, StorageErrorKind};
pub use memory::InMemorySnapshots;

/// Which persisted document to address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SnapshotKey {
    /// Cosmetics listing for a language
    #[display("cosmetics[{}]", _0)]
    Cosmetics(String),
    /// Playlists listing for a language
    #[display("playlists[{}]", _0)]
    Playlists(String),
    /// Baseline of the new-items feed (one per process)
    #[display("new_cosmetics")]
    NewItems,
}

impl SnapshotKey {
    /// Path of this document relative to the snapshot directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use loadout_storage::SnapshotKey;
    /// use std::path::PathBuf;
    ///
    /// assert_eq!(
    ///     SnapshotKey::Cosmetics("en".into()).relative_path(),
    ///     PathBuf::from("cosmetics/all_en.json")
    /// );
    /// assert_eq!(SnapshotKey::NewItems.relative_path(), PathBuf::from("new_cosmetics.json"));
    /// ```
    pub fn relative_path(&self) -> PathBuf {
        match self {
            SnapshotKey::Cosmetics(language) => {
                PathBuf::from("cosmetics").join(format!("all_{}.json", language))
            }
            SnapshotKey::Playlists(language) => {
                PathBuf::from("playlists").join(format!("{}.json", language))
            }
            SnapshotKey::NewItems => PathBuf::from("new_cosmetics.json"),
        }
    }
}

/// Trait for snapshot backends.
#[async_trait::async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Load the document stored under `key`.
    ///
    /// # Returns
    ///
    /// `None` if nothing has been saved under `key` yet.
    ///
    /// # Errors
    ///
    /// Returns error if the document exists but cannot be read or parsed.
    async fn load(&self, key: &SnapshotKey) -> LoadoutResult<Option<JsonValue>>;

    /// Replace the document stored under `key`.
    async fn save(&self, key: &SnapshotKey, payload: &JsonValue) -> LoadoutResult<()>;

    /// Check whether a document exists under `key`.
    async fn exists(&self, key: &SnapshotKey) -> LoadoutResult<bool>;
}
