//! Filesystem-backed snapshots.

use crate::{SnapshotKey, SnapshotStorage};
use loadout_error::{LoadoutResult, StorageError, StorageErrorKind};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

/// Snapshot backend writing one JSON file per [`SnapshotKey`].
///
/// Layout under the base directory:
///
/// ```text
/// cache/
/// ├── cosmetics/
/// │   ├── all_en.json
/// │   └── all_fr.json
/// ├── playlists/
/// │   └── en.json
/// └── new_cosmetics.json
/// ```
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileSystemSnapshots {
    base_path: PathBuf,
}

impl FileSystemSnapshots {
    /// Create a filesystem snapshot backend rooted at `base_path`.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> LoadoutResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Using snapshot directory");
        Ok(Self { base_path })
    }

    /// Root directory of this backend.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Absolute location of the document for `key`.
    pub fn path_for(&self, key: &SnapshotKey) -> PathBuf {
        self.base_path.join(key.relative_path())
    }
}

#[async_trait::async_trait]
impl SnapshotStorage for FileSystemSnapshots {
    #[tracing::instrument(skip(self), fields(key = %key))]
    async fn load(&self, key: &SnapshotKey) -> LoadoutResult<Option<JsonValue>> {
        let path = self.path_for(key);

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No snapshot on disk");
                return Ok(None);
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        let payload = serde_json::from_slice(&data).map_err(|e| {
            StorageError::new(StorageErrorKind::Serialization(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %path.display(), size = data.len(), "Loaded snapshot");
        Ok(Some(payload))
    }

    #[tracing::instrument(skip(self, payload), fields(key = %key))]
    async fn save(&self, key: &SnapshotKey, payload: &JsonValue) -> LoadoutResult<()> {
        let path = self.path_for(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let data = serde_json::to_vec(payload).map_err(|e| {
            StorageError::new(StorageErrorKind::Serialization(format!("{}: {}", key, e)))
        })?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %path.display(), size = data.len(), "Saved snapshot");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(key = %key))]
    async fn exists(&self, key: &SnapshotKey) -> LoadoutResult<bool> {
        let path = self.path_for(key);
        Ok(tokio::fs::try_exists(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
        })?)
    }
}
