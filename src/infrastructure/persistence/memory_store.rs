//! In-memory collection store for tests or ephemeral runs.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::repositories::{CollectionKey, CollectionStore, StoreResult};

/// A store that keeps serialized collections in process memory.
///
/// Nothing survives a restart. Used when `STORAGE_BACKEND=memory` and by the
/// handler tests, the same way a no-op cache stands in for Redis.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<CollectionKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        debug!("Using MemoryStore (persistence disabled)");
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn load_raw(&self, key: CollectionKey) -> StoreResult<Option<String>> {
        Ok(self.collections.read().await.get(&key).cloned())
    }

    async fn save_raw(&self, key: CollectionKey, contents: String) -> StoreResult<()> {
        self.collections.write().await.insert(key, contents);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
