//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin;
pub mod ads;
pub mod health;
pub mod tracking;

pub use admin::{
    admin_list_ads_handler, admin_stats_handler, create_ad_handler, delete_ad_handler,
};
pub use ads::list_ads_handler;
pub use health::health_handler;
pub use tracking::{click_handler, view_handler};
