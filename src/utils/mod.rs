//! Utility functions used across the application.
//!
//! - [`client_addr`] - Client IP resolution and a non-rejecting peer address extractor

pub mod client_addr;
