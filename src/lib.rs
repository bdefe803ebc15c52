//! # Ad Server
//!
//! A small ad-serving backend built with Axum: it keeps a catalog of text,
//! image and video ads, counts unique views and raw clicks per ad, and hides
//! ads whose view or click limit has been reached.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Ad and statistics entities, id policies, storage trait
//! - **Application Layer** ([`application`]) - Catalog, ad and statistics services
//! - **Infrastructure Layer** ([`infrastructure`]) - JSON file and in-memory storage
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export ADMIN_KEY="change-me"
//! export DATA_DIR="data"          # ads.json and ad_stats.json live here
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AdService, AdView, CatalogOptions, CatalogService, StatsService,
    };
    pub use crate::domain::IdPolicy;
    pub use crate::domain::entities::{Ad, AdId, AdKind, AdStats, LimitType, NewAd};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
