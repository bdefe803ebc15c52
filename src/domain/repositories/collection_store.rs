//! Persistence abstraction for whole-collection storage.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Names of the persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    /// Ordered list of ad definitions.
    Ads,
    /// Map of ad id to counters.
    AdStats,
}

impl CollectionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ads => "ads",
            Self::AdStats => "ad_stats",
        }
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by a [`CollectionStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O error for '{key}': {source}")]
    Io {
        key: CollectionKey,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed '{key}' collection: {source}")]
    Serialization {
        key: CollectionKey,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Raw storage of named collections.
///
/// Each call reads or replaces a whole collection. Implementations must make
/// `save_raw` atomic from the point of view of a concurrent `load_raw`: a
/// reader sees either the old contents or the new contents, never a mix.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::JsonFileStore`] - one JSON file per collection
/// - [`crate::infrastructure::persistence::MemoryStore`] - in-process, for tests and ephemeral runs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Returns the serialized collection, or `None` if it was never saved.
    async fn load_raw(&self, key: CollectionKey) -> StoreResult<Option<String>>;

    /// Replaces the serialized collection.
    async fn save_raw(&self, key: CollectionKey, contents: String) -> StoreResult<()>;

    /// Checks that the backend is reachable and writable.
    async fn health_check(&self) -> bool;
}

/// Loads and decodes a collection, returning `T::default()` if none exists yet.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the backend fails and
/// [`StoreError::Serialization`] if the stored contents do not decode.
pub async fn load_collection<T>(store: &dyn CollectionStore, key: CollectionKey) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
{
    match store.load_raw(key).await? {
        Some(contents) if !contents.trim().is_empty() => serde_json::from_str(&contents)
            .map_err(|source| StoreError::Serialization { key, source }),
        _ => Ok(T::default()),
    }
}

/// Encodes and atomically overwrites a collection.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if the value cannot be encoded and
/// [`StoreError::Io`] if the backend write fails.
pub async fn save_collection<T>(
    store: &dyn CollectionStore,
    key: CollectionKey,
    value: &T,
) -> StoreResult<()>
where
    T: Serialize + ?Sized,
{
    let contents = serde_json::to_string_pretty(value)
        .map_err(|source| StoreError::Serialization { key, source })?;
    store.save_raw(key, contents).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_load_missing_collection_returns_default() {
        let mut store = MockCollectionStore::new();
        store
            .expect_load_raw()
            .withf(|key| *key == CollectionKey::Ads)
            .times(1)
            .returning(|_| Ok(None));

        let ads: Vec<String> = load_collection(&store, CollectionKey::Ads).await.unwrap();
        assert!(ads.is_empty());
    }

    #[tokio::test]
    async fn test_load_blank_file_returns_default() {
        let mut store = MockCollectionStore::new();
        store
            .expect_load_raw()
            .returning(|_| Ok(Some("  \n".to_string())));

        let stats: BTreeMap<String, u64> = load_collection(&store, CollectionKey::AdStats)
            .await
            .unwrap();
        assert!(stats.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_collection_fails() {
        let mut store = MockCollectionStore::new();
        store
            .expect_load_raw()
            .returning(|_| Ok(Some("{not json".to_string())));

        let result: StoreResult<Vec<String>> = load_collection(&store, CollectionKey::Ads).await;
        assert!(matches!(result, Err(StoreError::Serialization { .. })));
    }

    #[tokio::test]
    async fn test_save_writes_pretty_json() {
        let mut store = MockCollectionStore::new();
        store
            .expect_save_raw()
            .withf(|key, contents| {
                *key == CollectionKey::Ads && contents.contains('\n') && contents.contains("\"a\"")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        save_collection(&store, CollectionKey::Ads, &vec!["a", "b"])
            .await
            .unwrap();
    }

    #[test]
    fn test_collection_key_names() {
        assert_eq!(CollectionKey::Ads.to_string(), "ads");
        assert_eq!(CollectionKey::AdStats.to_string(), "ad_stats");
    }
}
