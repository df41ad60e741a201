//! DTOs for registration, login and profile endpoints.
//!
//! Required string fields default to empty so that a missing field and an
//! empty one produce the same validation error from the account service.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::User;

/// Registration request body.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 100, message = "Name is too long"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 254, message = "Email is too long"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 1024, message = "Password is too long"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(max = 254))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 1024))]
    pub password: String,
}

/// Profile update; omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100, message = "Name is too long"))]
    pub name: Option<String>,

    #[validate(length(max = 254, message = "Email is too long"))]
    pub email: Option<String>,
}

/// Password change request body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub old_password: String,

    #[serde(default)]
    #[validate(length(max = 1024, message = "Password is too long"))]
    pub new_password: String,
}

/// Plain confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Public projection of a user; never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub user: UserView,
}
