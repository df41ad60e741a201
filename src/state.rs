//! Shared application state injected into every handler.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::services::{AccountService, AuthService, LinkService};
use crate::domain::repositories::{ApiKeyRepository, LinkRepository, UserRepository};
use crate::infrastructure::persistence::MemoryStore;
use crate::infrastructure::security::SessionTokens;

pub type SharedAuthService = AuthService<dyn ApiKeyRepository>;
pub type SharedAccountService = AccountService<dyn UserRepository, dyn ApiKeyRepository>;
pub type SharedLinkService = LinkService<dyn LinkRepository, dyn UserRepository>;

/// Services behind the HTTP surface.
///
/// Repositories are trait objects so the storage backend can be chosen at
/// startup (PostgreSQL or in-memory).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<SharedAuthService>,
    pub account_service: Arc<SharedAccountService>,
    pub link_service: Arc<SharedLinkService>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wires the services from a set of repositories.
    ///
    /// # Arguments
    ///
    /// - `links`, `users`, `api_keys` - repositories of the selected backend
    /// - `tokens` - session token issuer shared by login and authentication
    /// - `base_url` - prefix of generated short URLs
    pub fn new(
        links: Arc<dyn LinkRepository>,
        users: Arc<dyn UserRepository>,
        api_keys: Arc<dyn ApiKeyRepository>,
        tokens: Arc<SessionTokens>,
        base_url: &str,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(api_keys.clone(), tokens.clone())),
            account_service: Arc::new(AccountService::new(users.clone(), api_keys, tokens)),
            link_service: Arc::new(LinkService::new(links, users, base_url)),
            started_at: Utc::now(),
        }
    }

    /// Wires the services against one shared [`MemoryStore`].
    pub fn in_memory(store: Arc<MemoryStore>, tokens: Arc<SessionTokens>, base_url: &str) -> Self {
        Self::new(store.clone(), store.clone(), store, tokens, base_url)
    }
}
