//! HTTP middleware for request processing and protection.
//!
//! Provides admin authorization, rate limiting, and observability middleware.

pub mod admin_auth;
pub mod rate_limit;
pub mod tracing;
