//! Application layer services implementing business logic.
//!
//! Services own the in-memory collections, persist them through the domain
//! store trait, and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::ad_service::AdService`] - Ad list, insert under an id policy, delete
//! - [`services::stats_service::StatsService`] - Unique views, clicks, snapshots
//! - [`services::catalog_service::CatalogService`] - Joins both for listing, visibility and tracking

pub mod services;
