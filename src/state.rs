//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::CatalogService;
use crate::config::ViewerKeySource;
use crate::domain::repositories::CollectionStore;

/// Handler dependencies.
///
/// Cloned per request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub store: Arc<dyn CollectionStore>,
    pub admin_key: Arc<str>,
    pub viewer_key_source: ViewerKeySource,
    pub behind_proxy: bool,
}
