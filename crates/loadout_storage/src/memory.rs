//! In-memory snapshots.

use crate::{SnapshotKey, SnapshotStorage};
use loadout_error::LoadoutResult;
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Snapshot backend that keeps documents in memory.
///
/// Useful when running without a writable disk and in tests, where
/// [`InMemorySnapshots::writes`] shows how often a document was replaced.
#[derive(Debug, Default)]
pub struct InMemorySnapshots {
    documents: Mutex<HashMap<SnapshotKey, JsonValue>>,
    writes: Mutex<HashMap<SnapshotKey, usize>>,
}

impl InMemorySnapshots {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a document without counting it as a write.
    pub fn with_document(self, key: SnapshotKey, payload: JsonValue) -> Self {
        self.documents.lock().insert(key, payload);
        self
    }

    /// How many times `key` has been saved.
    pub fn writes(&self, key: &SnapshotKey) -> usize {
        self.writes.lock().get(key).copied().unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl SnapshotStorage for InMemorySnapshots {
    async fn load(&self, key: &SnapshotKey) -> LoadoutResult<Option<JsonValue>> {
        Ok(self.documents.lock().get(key).cloned())
    }

    async fn save(&self, key: &SnapshotKey, payload: &JsonValue) -> LoadoutResult<()> {
        self.documents.lock().insert(key.clone(), payload.clone());
        *self.writes.lock().entry(key.clone()).or_default() += 1;
        Ok(())
    }

    async fn exists(&self, key: &SnapshotKey) -> LoadoutResult<bool> {
        Ok(self.documents.lock().contains_key(key))
    }
}
