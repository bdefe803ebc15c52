//! Collection store implementations.
//!
//! Concrete implementations of [`crate::domain::repositories::CollectionStore`].
//!
//! # Stores
//!
//! - [`JsonFileStore`] - One JSON file per collection, atomic replace on write
//! - [`MemoryStore`] - Process-local, nothing persisted

pub mod json_file_store;
pub mod memory_store;

pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
