//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services are generic over repository traits
//! and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Shortening, redirects, history and metrics
//! - [`services::account_service::AccountService`] - Registration, login, profile and API keys
//! - [`services::auth_service::AuthService`] - Session token and API key authentication

pub mod services;
