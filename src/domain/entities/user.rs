//! User account entity.

use chrono::{DateTime, Utc};

/// A registered user.
///
/// `password_hash` is a PHC-formatted Argon2 hash and must never leave the
/// service layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: i64,
        name: String,
        email: String,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
            created_at,
        }
    }

    /// Normalizes an email address the way it is stored: trimmed and lower-cased.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

/// Input data for creating a user.
///
/// `email` must already be normalized with [`User::normalize_email`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}
