//! HTTP middleware for request processing and protection.
//!
//! Provides authentication, rate limiting, error detail exposure and
//! observability middleware.

pub mod auth;
pub mod error_detail;
pub mod rate_limit;
pub mod tracing;
