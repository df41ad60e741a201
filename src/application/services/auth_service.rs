//! Authentication service resolving credentials to a user id.

use serde_json::json;
use std::sync::Arc;

use crate::domain::repositories::ApiKeyRepository;
use crate::error::AppError;
use crate::infrastructure::security::SessionTokens;

/// A credential presented by a request.
///
/// The middleware picks exactly one form per request, so the two are never
/// combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials<'a> {
    /// Signed session token from `Authorization: Bearer`.
    Session(&'a str),
    /// Raw API key from `X-API-Key`.
    ApiKey(&'a str),
}

/// Service for authenticating requests via session tokens or API keys.
///
/// Session tokens are verified statelessly with [`SessionTokens`]; API keys are
/// looked up in the store, which also stamps their `last_used` time.
pub struct AuthService<K: ApiKeyRepository + ?Sized> {
    api_keys: Arc<K>,
    tokens: Arc<SessionTokens>,
}

impl<K: ApiKeyRepository + ?Sized> AuthService<K> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `api_keys` - API key repository for key lookups
    /// - `tokens` - session token issuer/verifier shared with the account service
    pub fn new(api_keys: Arc<K>, tokens: Arc<SessionTokens>) -> Self {
        Self { api_keys, tokens }
    }

    /// Resolves a credential to the id of the user it belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for an invalid or expired token or an
    /// unknown API key.
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, credentials: Credentials<'_>) -> Result<i64, AppError> {
        match credentials {
            Credentials::Session(token) => self.authenticate_session(token),
            Credentials::ApiKey(key) => self.authenticate_api_key(key).await,
        }
    }

    /// Verifies a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for any invalid token.
    pub fn authenticate_session(&self, token: &str) -> Result<i64, AppError> {
        self.tokens.verify(token)
    }

    /// Resolves an API key to its owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the key is empty or unknown.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate_api_key(&self, key: &str) -> Result<i64, AppError> {
        if key.is_empty() {
            return Err(invalid_api_key());
        }

        let user_id = self
            .api_keys
            .authenticate(key)
            .await?
            .ok_or_else(invalid_api_key)?;

        metrics::counter!("linfy_api_key_authentications_total").increment(1);
        tracing::debug!(user_id, "Authenticated with API key");

        Ok(user_id)
    }
}

fn invalid_api_key() -> AppError {
    AppError::unauthorized("Invalid API key", json!({}))
}
