//! View and click tracking service.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::entities::{AdId, AdStats};
use crate::domain::repositories::{CollectionKey, CollectionStore, load_collection, save_collection};
use crate::error::AppError;

/// Owns per-ad counters and the viewer sets used for view deduplication.
///
/// Views are counted once per distinct client key; clicks are counted on
/// every call. Records are created lazily on first reference.
///
/// Each mutation holds the write lock across the persist step. The entry is
/// changed in place and restored if the save fails, so callers never observe
/// a counter that was not written.
pub struct StatsService {
    store: Arc<dyn CollectionStore>,
    stats: RwLock<BTreeMap<AdId, AdStats>>,
}

impl StatsService {
    /// Loads the stats collection from `store`.
    ///
    /// Read failures degrade to an empty map. Records whose `views` disagree
    /// with their viewer set are repaired in memory.
    pub async fn load(store: Arc<dyn CollectionStore>) -> Self {
        let mut stats: BTreeMap<AdId, AdStats> =
            match load_collection(store.as_ref(), CollectionKey::AdStats).await {
                Ok(stats) => stats,
                Err(e) => {
                    warn!(error = %e, "Failed to load ad stats, starting with empty counters");
                    BTreeMap::new()
                }
            };

        for (id, entry) in stats.iter_mut() {
            if entry.repair() {
                warn!(%id, views = entry.views, "Repaired view count to match viewer set");
            }
        }

        info!(count = stats.len(), "Ad stats loaded");

        Self {
            store,
            stats: RwLock::new(stats),
        }
    }

    /// Creates a zeroed record for `id` if none exists.
    ///
    /// Persists only when a record was created.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the collection cannot be saved.
    pub async fn ensure(&self, id: &AdId) -> Result<(), AppError> {
        self.ensure_many(std::slice::from_ref(id)).await
    }

    /// Batch form of [`Self::ensure`]; writes at most once.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the collection cannot be saved.
    pub async fn ensure_many(&self, ids: &[AdId]) -> Result<(), AppError> {
        {
            let stats = self.stats.read().await;
            if ids.iter().all(|id| stats.contains_key(id)) {
                return Ok(());
            }
        }

        let mut stats = self.stats.write().await;
        let created: Vec<AdId> = ids
            .iter()
            .filter(|id| !stats.contains_key(*id))
            .cloned()
            .collect();
        if created.is_empty() {
            return Ok(());
        }

        for id in &created {
            stats.insert(id.clone(), AdStats::default());
        }

        if let Err(e) = save_collection(self.store.as_ref(), CollectionKey::AdStats, &*stats).await
        {
            for id in &created {
                stats.remove(id);
            }
            return Err(e.into());
        }

        debug!(count = created.len(), "Created stats records");
        Ok(())
    }

    /// Records a view of `id` by `client_key` and returns the current view count.
    ///
    /// A key that has already been counted for this ad does not increment the
    /// counter and does not trigger a write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `client_key` is blank.
    /// Returns [`AppError::Persistence`] if the collection cannot be saved.
    pub async fn record_view(&self, id: &AdId, client_key: &str) -> Result<u64, AppError> {
        let client_key = client_key.trim();
        if client_key.is_empty() {
            return Err(AppError::missing_client_key());
        }

        metrics::counter!("ad_views_total").increment(1);

        let mut stats = self.stats.write().await;
        let previous = stats.get(id).cloned();

        let entry = stats.entry(id.clone()).or_default();
        let counted = entry.add_viewer(client_key);
        let views = entry.views;

        if !counted {
            return Ok(views);
        }

        if let Err(e) = save_collection(self.store.as_ref(), CollectionKey::AdStats, &*stats).await
        {
            restore(&mut stats, id, previous);
            return Err(e.into());
        }

        debug!(%id, views, "Unique view recorded");
        metrics::counter!("ad_unique_views_total").increment(1);

        Ok(views)
    }

    /// Records a click on `id` and returns the new click count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the collection cannot be saved.
    pub async fn record_click(&self, id: &AdId) -> Result<u64, AppError> {
        let mut stats = self.stats.write().await;
        let previous = stats.get(id).cloned();

        let entry = stats.entry(id.clone()).or_default();
        entry.clicks += 1;
        let clicks = entry.clicks;

        if let Err(e) = save_collection(self.store.as_ref(), CollectionKey::AdStats, &*stats).await
        {
            restore(&mut stats, id, previous);
            return Err(e.into());
        }

        debug!(%id, clicks, "Click recorded");
        metrics::counter!("ad_clicks_total").increment(1);

        Ok(clicks)
    }

    /// Returns a snapshot of every record.
    pub async fn get_all(&self) -> BTreeMap<AdId, AdStats> {
        self.stats.read().await.clone()
    }

    /// Returns the record for `id`, or zeroed counters if none exists.
    pub async fn get(&self, id: &AdId) -> AdStats {
        self.stats.read().await.get(id).cloned().unwrap_or_default()
    }

    /// Deletes the record for `id`. Absent records are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the collection cannot be saved.
    pub async fn remove(&self, id: &AdId) -> Result<(), AppError> {
        let mut stats = self.stats.write().await;

        let Some(previous) = stats.remove(id) else {
            return Ok(());
        };

        if let Err(e) = save_collection(self.store.as_ref(), CollectionKey::AdStats, &*stats).await
        {
            stats.insert(id.clone(), previous);
            return Err(e.into());
        }

        debug!(%id, "Stats removed");
        Ok(())
    }
}

fn restore(stats: &mut BTreeMap<AdId, AdStats>, id: &AdId, previous: Option<AdStats>) {
    match previous {
        Some(entry) => {
            stats.insert(id.clone(), entry);
        }
        None => {
            stats.remove(id);
        }
    }
}
