//! Advertisement storage service.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::IdPolicy;
use crate::domain::entities::{Ad, AdId, NewAd};
use crate::domain::repositories::{CollectionKey, CollectionStore, load_collection, save_collection};
use crate::error::AppError;

/// Owns the ordered list of ads.
///
/// The collection is loaded once at construction and mirrored to the store
/// after every mutation. Mutations hold the write lock for the whole
/// read-modify-persist sequence and only commit to memory once the save has
/// succeeded, so a failed write leaves the service unchanged.
pub struct AdService {
    store: Arc<dyn CollectionStore>,
    ads: RwLock<Vec<Ad>>,
}

impl AdService {
    /// Loads the ads collection from `store`.
    ///
    /// A missing collection starts empty. A collection that cannot be read or
    /// decoded is logged and replaced by an empty list so the service degrades
    /// to serving no ads instead of failing to start.
    pub async fn load(store: Arc<dyn CollectionStore>) -> Self {
        let ads: Vec<Ad> = match load_collection(store.as_ref(), CollectionKey::Ads).await {
            Ok(ads) => ads,
            Err(e) => {
                warn!(error = %e, "Failed to load ads, starting with an empty list");
                Vec::new()
            }
        };

        info!(count = ads.len(), "Ads loaded");

        Self {
            store,
            ads: RwLock::new(ads),
        }
    }

    /// Returns all ads in insertion order.
    pub async fn list(&self) -> Vec<Ad> {
        self.ads.read().await.clone()
    }

    /// Returns the ad with the given id, if any.
    pub async fn get(&self, id: &AdId) -> Option<Ad> {
        self.ads.read().await.iter().find(|ad| &ad.id == id).cloned()
    }

    /// Inserts a new ad according to `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the policy needs a caller id and none
    /// was given.
    /// Returns [`AppError::DuplicateId`] under [`IdPolicy::Unique`] when the id
    /// is already taken.
    /// Returns [`AppError::Persistence`] if the collection cannot be saved.
    pub async fn insert(&self, new_ad: NewAd, policy: IdPolicy) -> Result<Ad, AppError> {
        let mut ads = self.ads.write().await;
        let mut next = ads.clone();

        let ad = match policy {
            IdPolicy::Unique => {
                let id = require_id(&new_ad)?;
                if next.iter().any(|ad| ad.id == id) {
                    return Err(AppError::duplicate_id(
                        "An ad with this id already exists",
                        json!({ "id": id }),
                    ));
                }
                let ad = new_ad.into_ad(id);
                next.push(ad.clone());
                ad
            }
            IdPolicy::Overwrite => {
                let id = require_id(&new_ad)?;
                let ad = new_ad.into_ad(id);
                match next.iter_mut().find(|existing| existing.id == ad.id) {
                    Some(existing) => *existing = ad.clone(),
                    None => next.push(ad.clone()),
                }
                ad
            }
            IdPolicy::AutoIncrement => {
                let id = next_sequential_id(&next)?;
                let ad = new_ad.into_ad(id);
                next.push(ad.clone());
                ad
            }
        };

        save_collection(self.store.as_ref(), CollectionKey::Ads, &next).await?;
        *ads = next;

        info!(id = %ad.id, kind = %ad.kind, policy = %policy, "Ad stored");
        metrics::counter!("ads_created_total").increment(1);

        Ok(ad)
    }

    /// Removes the ad with the given id.
    ///
    /// Returns `false` without touching the store if no such ad exists.
    /// Stats are not cascaded here; see
    /// [`crate::application::services::CatalogService::delete_ad`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the collection cannot be saved.
    pub async fn delete(&self, id: &AdId) -> Result<bool, AppError> {
        let mut ads = self.ads.write().await;

        let Some(position) = ads.iter().position(|ad| &ad.id == id) else {
            return Ok(false);
        };

        let mut next = ads.clone();
        next.remove(position);

        save_collection(self.store.as_ref(), CollectionKey::Ads, &next).await?;
        *ads = next;

        info!(%id, "Ad deleted");
        metrics::counter!("ads_deleted_total").increment(1);

        Ok(true)
    }
}

fn require_id(new_ad: &NewAd) -> Result<AdId, AppError> {
    new_ad
        .id
        .clone()
        .ok_or_else(|| AppError::bad_request("Ad id is required", json!({ "field": "id" })))
}

/// One greater than the largest numeric id, or 1 when there is none.
fn next_sequential_id(ads: &[Ad]) -> Result<AdId, AppError> {
    let next = match ads.iter().filter_map(|ad| ad.id.as_number()).max() {
        None => 1,
        Some(max) => max.checked_add(1).ok_or_else(|| {
            AppError::bad_request("Ad id space exhausted", json!({ "max_id": max }))
        })?,
    };

    Ok(AdId::from(next))
}
