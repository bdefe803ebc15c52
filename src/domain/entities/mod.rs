//! Core domain entities representing the advertisement data model.
//!
//! # Entity Types
//!
//! - [`Ad`] - A stored advertisement definition with an optional visibility cap
//! - [`AdStats`] - View and click counters for one ad
//! - [`AdId`] - Identifier shared by both collections
//!
//! `NewAd` carries validated creation input; the id is optional because the
//! sequential id policy assigns it.

pub mod ad;
pub mod ad_id;
pub mod ad_stats;

pub use ad::{Ad, AdKind, LimitType, NewAd};
pub use ad_id::AdId;
pub use ad_stats::AdStats;
