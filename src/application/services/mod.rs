//! Business logic services for the application layer.

pub mod ad_service;
pub mod catalog_service;
pub mod stats_service;

pub use ad_service::AdService;
pub use catalog_service::{AdView, CatalogOptions, CatalogService};
pub use stats_service::StatsService;
