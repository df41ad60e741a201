//! DTOs for API key management endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::ApiKey;

/// Returned once, when a key is created. The only response that carries the secret.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyCreatedResponse {
    pub api_key: String,
    pub key_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ApiKey> for ApiKeyCreatedResponse {
    fn from(key: ApiKey) -> Self {
        Self {
            api_key: key.key,
            key_id: key.id,
            created_at: key.created_at,
        }
    }
}

/// Listing entry for a key, without the secret.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyView {
    pub key_id: i64,
    pub created_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}

impl From<ApiKey> for ApiKeyView {
    fn from(key: ApiKey) -> Self {
        Self {
            key_id: key.id,
            created_at: key.created_at,
            last_used: key.last_used,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyListResponse {
    pub api_keys: Vec<ApiKeyView>,
}
