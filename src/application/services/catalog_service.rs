//! Composition of ads and their counters for display and administration.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use super::{AdService, StatsService};
use crate::domain::IdPolicy;
use crate::domain::entities::{Ad, AdId, AdStats, NewAd};
use crate::error::AppError;

/// An ad enriched with its current counters.
///
/// `active` is only populated for administrative listings; public listings
/// contain active ads exclusively and omit the flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdView {
    #[serde(flatten)]
    pub ad: Ad,
    pub views: u64,
    pub clicks: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Behaviour switches for [`CatalogService`].
#[derive(Debug, Clone, Copy)]
pub struct CatalogOptions {
    /// How inserts treat caller-supplied ids.
    pub id_policy: IdPolicy,
    /// Whether deleting an ad also deletes its stats record.
    pub cascade_delete_stats: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            id_policy: IdPolicy::Unique,
            cascade_delete_stats: true,
        }
    }
}

/// Joins [`AdService`] and [`StatsService`] into the operations exposed over HTTP.
///
/// Neither collection is owned here; both services are shared. Locks are
/// never held on both collections at the same time.
pub struct CatalogService {
    ads: Arc<AdService>,
    stats: Arc<StatsService>,
    options: CatalogOptions,
}

impl CatalogService {
    pub fn new(ads: Arc<AdService>, stats: Arc<StatsService>, options: CatalogOptions) -> Self {
        Self {
            ads,
            stats,
            options,
        }
    }

    pub fn options(&self) -> CatalogOptions {
        self.options
    }

    /// Returns the ads whose limit has not been reached, in insertion order.
    pub async fn list_visible(&self) -> Vec<AdView> {
        self.enriched()
            .await
            .into_iter()
            .filter(|(_, active)| *active)
            .map(|(view, _)| view)
            .collect()
    }

    /// Returns every ad in insertion order, each annotated with its `active` flag.
    pub async fn list_all(&self) -> Vec<AdView> {
        self.enriched()
            .await
            .into_iter()
            .map(|(mut view, active)| {
                view.active = Some(active);
                view
            })
            .collect()
    }

    async fn enriched(&self) -> Vec<(AdView, bool)> {
        let ads = self.ads.list().await;

        let ids: Vec<AdId> = ads.iter().map(|ad| ad.id.clone()).collect();
        if let Err(e) = self.stats.ensure_many(&ids).await {
            // Counters for unseen ads are zero either way.
            warn!(error = %e, "Failed to create missing stats records while listing");
        }

        let snapshot = self.stats.get_all().await;

        ads.into_iter()
            .map(|ad| {
                let stats = snapshot.get(&ad.id).cloned().unwrap_or_default();
                let active = ad.is_active(&stats);
                let view = AdView {
                    views: stats.views,
                    clicks: stats.clicks,
                    active: None,
                    ad,
                };
                (view, active)
            })
            .collect()
    }

    /// Stores a new ad under the configured id policy and creates its counters.
    ///
    /// # Errors
    ///
    /// See [`AdService::insert`]. A failure to create the counters after the
    /// ad was stored is logged; the record is created lazily later.
    pub async fn create_ad(&self, new_ad: NewAd) -> Result<Ad, AppError> {
        let ad = self.ads.insert(new_ad, self.options.id_policy).await?;

        if let Err(e) = self.stats.ensure(&ad.id).await {
            warn!(id = %ad.id, error = %e, "Ad stored but stats record could not be created");
        }

        Ok(ad)
    }

    /// Deletes an ad and, when cascading is enabled, its counters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no ad has this id.
    /// Returns [`AppError::Persistence`] if either collection cannot be saved.
    pub async fn delete_ad(&self, id: &AdId) -> Result<(), AppError> {
        if !self.ads.delete(id).await? {
            return Err(AppError::not_found("Ad not found", json!({ "id": id })));
        }

        if self.options.cascade_delete_stats {
            self.stats.remove(id).await?;
        }

        info!(%id, cascade = self.options.cascade_delete_stats, "Ad removed from catalog");
        Ok(())
    }

    /// Records a unique view of an existing ad.
    ///
    /// Counting continues after the ad's limit has been reached.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no ad has this id.
    /// Returns [`AppError::Validation`] if `client_key` is blank.
    /// Returns [`AppError::Persistence`] if the stats cannot be saved.
    pub async fn record_view(&self, id: &AdId, client_key: &str) -> Result<u64, AppError> {
        self.require_ad(id).await?;
        self.stats.record_view(id, client_key).await
    }

    /// Records a click on an existing ad.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no ad has this id.
    /// Returns [`AppError::Persistence`] if the stats cannot be saved.
    pub async fn record_click(&self, id: &AdId) -> Result<u64, AppError> {
        self.require_ad(id).await?;
        self.stats.record_click(id).await
    }

    /// Returns every stats record, including orphans left by non-cascading deletes.
    pub async fn stats(&self) -> BTreeMap<AdId, AdStats> {
        self.stats.get_all().await
    }

    async fn require_ad(&self, id: &AdId) -> Result<(), AppError> {
        if self.ads.get(id).await.is_none() {
            return Err(AppError::not_found("Ad not found", json!({ "id": id })));
        }
        Ok(())
    }
}
