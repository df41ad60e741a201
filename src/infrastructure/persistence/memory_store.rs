//! In-process store implementing every repository trait.
//!
//! All state sits behind one async mutex, so each repository call is atomic:
//! uniqueness checks and inserts, the API-key cap and the click increment all
//! happen under the same lock. Data does not survive a restart.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::entities::{ApiKey, Link, NewLink, NewUser, ProfilePatch, User};
use crate::domain::repositories::{ApiKeyRepository, LinkRepository, UserRepository};
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    next_user_id: i64,
    next_key_id: i64,
    next_link_id: i64,
    users: BTreeMap<i64, User>,
    api_keys: BTreeMap<i64, ApiKey>,
    links: BTreeMap<i64, Link>,
}

impl Inner {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// Volatile store for local development and tests.
///
/// Share one instance (behind an `Arc`) as the link, user and API-key repository.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using in-memory store");
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn email_conflict() -> AppError {
    AppError::conflict("Email already registered", json!({ "field": "email" }))
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.lock().await;

        if inner.email_taken(&new_user.email, None) {
            return Err(email_conflict());
        }

        inner.next_user_id += 1;
        let user = User::new(
            inner.next_user_id,
            new_user.name,
            new_user.email,
            new_user.password_hash,
            Utc::now(),
        );
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn update_profile(
        &self,
        id: i64,
        patch: ProfilePatch,
    ) -> Result<Option<User>, AppError> {
        let mut inner = self.inner.lock().await;

        if !inner.users.contains_key(&id) {
            return Ok(None);
        }

        if let Some(email) = &patch.email
            && inner.email_taken(email, Some(id))
        {
            return Err(email_conflict());
        }

        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }

        Ok(Some(user.clone()))
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().await;

        match inner.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.values().cloned().collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.len() as i64)
    }
}

#[async_trait]
impl ApiKeyRepository for MemoryStore {
    async fn create(&self, user_id: i64, key: &str, max_keys: usize) -> Result<ApiKey, AppError> {
        let mut inner = self.inner.lock().await;

        if !inner.users.contains_key(&user_id) {
            return Err(AppError::not_found(
                "User not found",
                json!({ "user_id": user_id }),
            ));
        }

        let existing = inner
            .api_keys
            .values()
            .filter(|k| k.user_id == user_id)
            .count();

        if existing >= max_keys {
            return Err(AppError::conflict(
                format!("Maximum {max_keys} API keys allowed"),
                json!({ "limit": max_keys }),
            ));
        }

        if inner.api_keys.values().any(|k| k.key == key) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "api_keys_key_key" }),
            ));
        }

        inner.next_key_id += 1;
        let api_key = ApiKey::new(
            inner.next_key_id,
            user_id,
            key.to_string(),
            Utc::now(),
            None,
        );
        inner.api_keys.insert(api_key.id, api_key.clone());

        Ok(api_key)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<ApiKey>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .api_keys
            .values()
            .filter(|k| k.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, user_id: i64, key_id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().await;

        let owned = inner
            .api_keys
            .get(&key_id)
            .is_some_and(|k| k.user_id == user_id);

        if owned {
            inner.api_keys.remove(&key_id);
        }

        Ok(owned)
    }

    async fn authenticate(&self, key: &str) -> Result<Option<i64>, AppError> {
        let mut inner = self.inner.lock().await;

        Ok(inner
            .api_keys
            .values_mut()
            .find(|k| k.key == key)
            .map(|k| {
                k.last_used = Some(Utc::now());
                k.user_id
            }))
    }
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn insert(&self, new_link: NewLink) -> Result<Option<Link>, AppError> {
        let mut inner = self.inner.lock().await;

        if inner
            .links
            .values()
            .any(|l| l.url_code == new_link.url_code)
        {
            return Ok(None);
        }

        if let Some(owner) = new_link.user_id
            && inner
                .links
                .values()
                .any(|l| l.user_id == Some(owner) && l.original_url == new_link.original_url)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_owner_url_key" }),
            ));
        }

        inner.next_link_id += 1;
        let link = new_link.into_link(inner.next_link_id, Utc::now());
        inner.links.insert(link.id, link.clone());

        Ok(Some(link))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.links.values().find(|l| l.url_code == code).cloned())
    }

    async fn find_by_owner_and_url(
        &self,
        user_id: i64,
        original_url: &str,
    ) -> Result<Option<Link>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .links
            .values()
            .find(|l| l.user_id == Some(user_id) && l.original_url == original_url)
            .cloned())
    }

    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        let inner = self.inner.lock().await;

        let mut links: Vec<Link> = inner
            .links
            .values()
            .filter(|l| l.user_id == Some(user_id))
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(links)
    }

    async fn record_click(&self, code: &str) -> Result<Option<Link>, AppError> {
        let mut inner = self.inner.lock().await;

        Ok(inner
            .links
            .values_mut()
            .find(|l| l.url_code == code)
            .map(|l| {
                l.clicks += 1;
                l.last_accessed = Utc::now();
                l.clone()
            }))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.links.len() as i64)
    }

    async fn total_clicks(&self) -> Result<i64, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.links.values().map(|l| l.clicks).sum())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
