//! Account management: registration, login, profile and API keys.

use serde_json::json;
use std::sync::{Arc, LazyLock};
use tokio::task;
use validator::ValidateEmail;

use crate::domain::entities::{ApiKey, MAX_API_KEYS_PER_USER, NewUser, ProfilePatch, User};
use crate::domain::repositories::{ApiKeyRepository, UserRepository};
use crate::error::AppError;
use crate::infrastructure::security::SessionTokens;
use crate::infrastructure::security::password::{hash_password, verify_password};
use crate::utils::code_generator::generate_api_key;

/// Hash verified against when the email is unknown, so a failed login costs the
/// same whether or not the account exists. Only dereferenced on blocking threads.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("linfy-dummy-password").ok());

/// Service for user accounts and their credentials.
pub struct AccountService<U, K>
where
    U: UserRepository + ?Sized,
    K: ApiKeyRepository + ?Sized,
{
    users: Arc<U>,
    api_keys: Arc<K>,
    tokens: Arc<SessionTokens>,
}

impl<U, K> AccountService<U, K>
where
    U: UserRepository + ?Sized,
    K: ApiKeyRepository + ?Sized,
{
    /// Creates a new account service.
    pub fn new(users: Arc<U>, api_keys: Arc<K>, tokens: Arc<SessionTokens>) -> Self {
        Self {
            users,
            api_keys,
            tokens,
        }
    }

    /// Registers a new user.
    ///
    /// Name and email are trimmed, the email is lower-cased, and the password is
    /// hashed with Argon2id before anything is stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field is missing or the email is malformed.
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on hashing or database errors.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let name = name.trim();
        let email = User::normalize_email(email);

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::bad_request(
                "Name, email, and password required",
                json!({}),
            ));
        }

        ensure_valid_email(&email)?;

        let password_hash = hash_blocking(password.to_string()).await?;

        let user = self
            .users
            .create(NewUser {
                name: name.to_string(),
                email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");

        Ok(user)
    }

    /// Verifies credentials and issues a session token.
    ///
    /// Unknown email and wrong password produce the same error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if either field is missing.
    /// Returns [`AppError::Unauthorized`] if the credentials do not match.
    /// Returns [`AppError::Internal`] on hashing, signing or database errors.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        let email = User::normalize_email(email);

        if email.is_empty() || password.is_empty() {
            return Err(AppError::bad_request(
                "Email and password required",
                json!({}),
            ));
        }

        let user = self.users.find_by_email(&email).await?;

        let Some(user) = user else {
            verify_dummy_blocking(password.to_string()).await?;
            return Err(invalid_credentials());
        };

        if !verify_blocking(password.to_string(), user.password_hash.clone()).await? {
            return Err(invalid_credentials());
        }

        let token = self.tokens.issue(user.id)?;

        metrics::counter!("linfy_logins_total").increment(1);
        tracing::info!(user_id = user.id, "User logged in");

        Ok((token, user))
    }

    /// Returns the caller's profile.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user no longer exists.
    pub async fn profile(&self, user_id: i64) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(user_not_found)
    }

    /// Updates the provided profile fields.
    ///
    /// Blank fields count as not provided.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if neither field is provided or the email is malformed.
    /// Returns [`AppError::Conflict`] if the email belongs to another user.
    /// Returns [`AppError::NotFound`] if the user no longer exists.
    pub async fn update_profile(
        &self,
        user_id: i64,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User, AppError> {
        let patch = ProfilePatch {
            name: name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            email: email
                .map(User::normalize_email)
                .filter(|e| !e.is_empty()),
        };

        if patch.is_empty() {
            return Err(AppError::bad_request("Name or email required", json!({})));
        }

        if let Some(email) = &patch.email {
            ensure_valid_email(email)?;
        }

        let user = self
            .users
            .update_profile(user_id, patch)
            .await?
            .ok_or_else(user_not_found)?;

        tracing::info!(user_id, "Profile updated");

        Ok(user)
    }

    /// Replaces the password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if either password is missing.
    /// Returns [`AppError::Forbidden`] if the current password is wrong.
    /// Returns [`AppError::NotFound`] if the user no longer exists.
    pub async fn change_password(
        &self,
        user_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if old_password.is_empty() || new_password.is_empty() {
            return Err(AppError::bad_request(
                "Old and new password required",
                json!({}),
            ));
        }

        let user = self.profile(user_id).await?;

        if !verify_blocking(old_password.to_string(), user.password_hash).await? {
            return Err(AppError::forbidden(
                "Old password is incorrect",
                json!({}),
            ));
        }

        let password_hash = hash_blocking(new_password.to_string()).await?;

        if !self.users.update_password(user_id, &password_hash).await? {
            return Err(user_not_found());
        }

        tracing::info!(user_id, "Password changed");

        Ok(())
    }

    /// Issues a new API key, up to [`MAX_API_KEYS_PER_USER`] per user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the user already holds the maximum.
    /// Returns [`AppError::NotFound`] if the user no longer exists.
    pub async fn create_api_key(&self, user_id: i64) -> Result<ApiKey, AppError> {
        let key = generate_api_key()?;

        let api_key = self
            .api_keys
            .create(user_id, &key, MAX_API_KEYS_PER_USER)
            .await?;

        tracing::info!(user_id, key_id = api_key.id, "API key created");

        Ok(api_key)
    }

    /// Lists the caller's API keys.
    pub async fn list_api_keys(&self, user_id: i64) -> Result<Vec<ApiKey>, AppError> {
        self.api_keys.list_for_user(user_id).await
    }

    /// Revokes one of the caller's API keys.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the caller has no key with this id.
    pub async fn revoke_api_key(&self, user_id: i64, key_id: i64) -> Result<(), AppError> {
        if !self.api_keys.delete(user_id, key_id).await? {
            return Err(api_key_not_found(key_id));
        }

        tracing::info!(user_id, key_id, "API key revoked");

        Ok(())
    }
}

fn ensure_valid_email(email: &str) -> Result<(), AppError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "Invalid email format",
            json!({ "field": "email" }),
        ))
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid credentials", json!({}))
}

fn user_not_found() -> AppError {
    AppError::not_found("User not found", json!({}))
}

/// The error returned when a key id is unknown or belongs to someone else.
pub fn api_key_not_found(key_id: impl serde::Serialize) -> AppError {
    AppError::not_found("API key not found", json!({ "key_id": key_id }))
}

async fn hash_blocking(password: String) -> Result<String, AppError> {
    task::spawn_blocking(move || hash_password(&password)).await?
}

async fn verify_blocking(password: String, password_hash: String) -> Result<bool, AppError> {
    task::spawn_blocking(move || verify_password(&password, &password_hash)).await?
}

/// Spends one verification on [`DUMMY_HASH`], hashing it first on the initial
/// call. Always fails.
async fn verify_dummy_blocking(password: String) -> Result<bool, AppError> {
    task::spawn_blocking(move || match DUMMY_HASH.as_deref() {
        Some(dummy) => verify_password(&password, dummy).map(|_| false),
        None => Ok(false),
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockApiKeyRepository, MockUserRepository};
    use chrono::{Duration, Utc};

    fn tokens() -> Arc<SessionTokens> {
        Arc::new(SessionTokens::new("test-jwt-secret", Duration::days(7)))
    }

    fn stored_user(id: i64, password: &str) -> User {
        User::new(
            id,
            "Ada".to_string(),
            "a@x.com".to_string(),
            hash_password(password).unwrap(),
            Utc::now(),
        )
    }

    fn service(
        users: MockUserRepository,
        keys: MockApiKeyRepository,
    ) -> AccountService<MockUserRepository, MockApiKeyRepository> {
        AccountService::new(Arc::new(users), Arc::new(keys), tokens())
    }

    #[tokio::test]
    async fn test_register_normalizes_and_hashes() {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .withf(|u| {
                u.name == "Ada"
                    && u.email == "a@x.com"
                    && u.password_hash.starts_with("$argon2id$")
                    && u.password_hash != "secret1"
            })
            .times(1)
            .returning(|u| Ok(User::new(1, u.name, u.email, u.password_hash, Utc::now())));

        let service = service(users, MockApiKeyRepository::new());

        let user = service
            .register("  Ada ", " A@X.com ", "secret1")
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let mut users = MockUserRepository::new();
        users.expect_create().times(0);

        let service = service(users, MockApiKeyRepository::new());

        for (name, email, password) in [
            ("", "a@x.com", "pw"),
            ("Ada", "   ", "pw"),
            ("Ada", "a@x.com", ""),
        ] {
            let result = service.register(name, email, password).await;
            assert!(matches!(result, Err(AppError::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let service = service(MockUserRepository::new(), MockApiKeyRepository::new());

        let result = service.register("Ada", "not-an-email", "pw").await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut users = MockUserRepository::new();
        users.expect_create().times(1).returning(|_| {
            Err(AppError::conflict(
                "Email already registered",
                json!({ "field": "email" }),
            ))
        });

        let service = service(users, MockApiKeyRepository::new());

        let result = service.register("Ada", "a@x.com", "pw").await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_login_success_issues_token() {
        let user = stored_user(9, "secret1");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email == "a@x.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let tokens = tokens();
        let service = AccountService::new(
            Arc::new(users),
            Arc::new(MockApiKeyRepository::new()),
            tokens.clone(),
        );

        let (token, user) = service.login("A@x.com", "secret1").await.unwrap();

        assert_eq!(user.id, 9);
        assert_eq!(tokens.verify(&token).unwrap(), 9);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let user = stored_user(9, "secret1");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |email| {
                Ok((email == "a@x.com").then(|| user.clone()))
            });

        let service = service(users, MockApiKeyRepository::new());

        let wrong_password = service.login("a@x.com", "wrong").await.unwrap_err();
        let unknown_email = service.login("nobody@x.com", "secret1").await.unwrap_err();

        assert_eq!(wrong_password.status(), unknown_email.status());
        assert_eq!(
            wrong_password.to_error_info().message,
            unknown_email.to_error_info().message
        );
        assert_eq!(
            wrong_password.to_error_info().details,
            unknown_email.to_error_info().details
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_dummy_verification_runs_off_the_runtime() {
        let runtime_thread = std::thread::current().id();
        let hashing_thread = task::spawn_blocking(|| {
            assert!(DUMMY_HASH.is_some());
            std::thread::current().id()
        })
        .await
        .unwrap();
        assert_ne!(runtime_thread, hashing_thread);

        assert!(!verify_dummy_blocking("secret1".to_string()).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_profile_requires_a_field() {
        let mut users = MockUserRepository::new();
        users.expect_update_profile().times(0);

        let service = service(users, MockApiKeyRepository::new());

        let result = service.update_profile(1, Some("  "), None).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_profile_only_changes_provided_fields() {
        let mut users = MockUserRepository::new();
        users
            .expect_update_profile()
            .withf(|id, patch| {
                *id == 1 && patch.name.is_none() && patch.email.as_deref() == Some("new@x.com")
            })
            .times(1)
            .returning(|id, patch| {
                Ok(Some(User::new(
                    id,
                    "Ada".to_string(),
                    patch.email.unwrap_or_default(),
                    "hash".to_string(),
                    Utc::now(),
                )))
            });

        let service = service(users, MockApiKeyRepository::new());

        let user = service
            .update_profile(1, None, Some("New@X.com"))
            .await
            .unwrap();

        assert_eq!(user.email, "new@x.com");
        assert_eq!(user.name, "Ada");
    }

    #[tokio::test]
    async fn test_change_password_wrong_current_is_forbidden() {
        let user = stored_user(4, "secret1");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users.expect_update_password().times(0);

        let service = service(users, MockApiKeyRepository::new());

        let result = service.change_password(4, "wrong", "secret2").await;

        assert!(matches!(result, Err(AppError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_change_password_stores_new_hash() {
        let user = stored_user(4, "secret1");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_update_password()
            .withf(|id, hash| *id == 4 && verify_password("secret2", hash).unwrap())
            .times(1)
            .returning(|_, _| Ok(true));

        let service = service(users, MockApiKeyRepository::new());

        service.change_password(4, "secret1", "secret2").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_api_key_passes_cap() {
        let mut keys = MockApiKeyRepository::new();
        keys.expect_create()
            .withf(|user_id, key, max| *user_id == 2 && key.len() == 64 && *max == 5)
            .times(1)
            .returning(|user_id, key, _| {
                Ok(ApiKey::new(1, user_id, key.to_string(), Utc::now(), None))
            });

        let service = service(MockUserRepository::new(), keys);

        let api_key = service.create_api_key(2).await.unwrap();

        assert_eq!(api_key.key.len(), 64);
    }

    #[tokio::test]
    async fn test_revoke_unknown_key_is_not_found() {
        let mut keys = MockApiKeyRepository::new();
        keys.expect_delete().times(1).returning(|_, _| Ok(false));

        let service = service(MockUserRepository::new(), keys);

        let result = service.revoke_api_key(2, 99).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}
