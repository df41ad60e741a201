//! API key entity.

use chrono::{DateTime, Utc};

/// Maximum number of API keys a single user may hold.
pub const MAX_API_KEYS_PER_USER: usize = 5;

/// A long-lived credential usable in place of a session token.
///
/// The raw `key` is stored as issued and is only ever shown to the owner in the
/// creation response. Listing endpoints project the key to its id and timestamps.
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub id: i64,
    pub user_id: i64,
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}

impl ApiKey {
    pub fn new(
        id: i64,
        user_id: i64,
        key: String,
        created_at: DateTime<Utc>,
        last_used: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            user_id,
            key,
            created_at,
            last_used,
        }
    }
}
