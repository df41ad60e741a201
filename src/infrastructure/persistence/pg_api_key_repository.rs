//! PostgreSQL implementation of API key repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::ApiKey;
use crate::domain::repositories::ApiKeyRepository;
use crate::error::AppError;

/// PostgreSQL repository for per-user API keys.
///
/// The per-user cap is enforced inside a transaction holding a row lock on the
/// owning user, so concurrent creates for the same user are serialized.
pub struct PgApiKeyRepository {
    pool: Arc<PgPool>,
}

impl PgApiKeyRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ApiKeyRow {
    id: i64,
    user_id: i64,
    key: String,
    created_at: DateTime<Utc>,
    last_used: Option<DateTime<Utc>>,
}

impl From<ApiKeyRow> for ApiKey {
    fn from(r: ApiKeyRow) -> Self {
        ApiKey::new(r.id, r.user_id, r.key, r.created_at, r.last_used)
    }
}

#[async_trait]
impl ApiKeyRepository for PgApiKeyRepository {
    async fn create(&self, user_id: i64, key: &str, max_keys: usize) -> Result<ApiKey, AppError> {
        let mut tx = self.pool.begin().await?;

        let owner: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        if owner.is_none() {
            return Err(AppError::not_found(
                "User not found",
                json!({ "user_id": user_id }),
            ));
        }

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM api_keys WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        if existing >= max_keys as i64 {
            return Err(AppError::conflict(
                format!("Maximum {max_keys} API keys allowed"),
                json!({ "limit": max_keys }),
            ));
        }

        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            INSERT INTO api_keys (user_id, key)
            VALUES ($1, $2)
            RETURNING id, user_id, key, created_at, last_used
            "#,
        )
        .bind(user_id)
        .bind(key)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<ApiKey>, AppError> {
        let rows = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, user_id, key, created_at, last_used
            FROM api_keys
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ApiKey::from).collect())
    }

    async fn delete(&self, user_id: i64, key_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1 AND user_id = $2")
            .bind(key_id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn authenticate(&self, key: &str) -> Result<Option<i64>, AppError> {
        let user_id: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE api_keys
            SET last_used = NOW()
            WHERE key = $1
            RETURNING user_id
            "#,
        )
        .bind(key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user_id)
    }
}
