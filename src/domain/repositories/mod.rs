//! Persistence trait definitions for the domain layer.
//!
//! Both services persist whole collections through [`CollectionStore`]; the
//! typed helpers [`load_collection`] and [`save_collection`] handle JSON
//! encoding so implementations only move strings.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing

pub mod collection_store;

pub use collection_store::{
    CollectionKey, CollectionStore, StoreError, StoreResult, load_collection, save_collection,
};

#[cfg(test)]
pub use collection_store::MockCollectionStore;
