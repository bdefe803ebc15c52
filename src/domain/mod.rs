//! Domain layer containing business entities and persistence contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Ads, their counters and identifiers
//! - [`repositories`] - Collection persistence trait and typed helpers
//! - [`id_policy`] - How inserts treat caller-supplied ids
//!
//! The domain layer has no dependencies on the HTTP or infrastructure layers.
//! Business operations live in [`crate::application::services`].

pub mod entities;
pub mod id_policy;
pub mod repositories;

pub use id_policy::IdPolicy;
