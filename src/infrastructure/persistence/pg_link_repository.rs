//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for link storage, lookup and click counting.
///
/// Code uniqueness and per-owner deduplication are enforced by the
/// `links_url_code_key` and `links_owner_url_key` indexes.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    original_url: String,
    url_code: String,
    short_url: String,
    qr_code: String,
    clicks: i64,
    created_at: DateTime<Utc>,
    last_accessed: DateTime<Utc>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    user_id: Option<i64>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            id: r.id,
            original_url: r.original_url,
            url_code: r.url_code,
            short_url: r.short_url,
            qr_code: r.qr_code,
            clicks: r.clicks,
            created_at: r.created_at,
            last_accessed: r.last_accessed,
            ip_address: r.ip_address,
            user_agent: r.user_agent,
            user_id: r.user_id,
        }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (original_url, url_code, short_url, qr_code, ip_address, user_agent, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (url_code) DO NOTHING
            RETURNING id, original_url, url_code, short_url, qr_code, clicks,
                      created_at, last_accessed, ip_address, user_agent, user_id
            "#,
        )
        .bind(&new_link.original_url)
        .bind(&new_link.url_code)
        .bind(&new_link.short_url)
        .bind(&new_link.qr_code)
        .bind(&new_link.ip_address)
        .bind(&new_link.user_agent)
        .bind(new_link.user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, url_code, short_url, qr_code, clicks,
                   created_at, last_accessed, ip_address, user_agent, user_id
            FROM links
            WHERE url_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_owner_and_url(
        &self,
        user_id: i64,
        original_url: &str,
    ) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, url_code, short_url, qr_code, clicks,
                   created_at, last_accessed, ip_address, user_agent, user_id
            FROM links
            WHERE user_id = $1
              AND md5(original_url) = md5($2)
              AND original_url = $2
            "#,
        )
        .bind(user_id)
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, url_code, short_url, qr_code, clicks,
                   created_at, last_accessed, ip_address, user_agent, user_id
            FROM links
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn record_click(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            UPDATE links
            SET clicks = clicks + 1,
                last_accessed = NOW()
            WHERE url_code = $1
            RETURNING id, original_url, url_code, short_url, qr_code, clicks,
                      created_at, last_accessed, ip_address, user_agent, user_id
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn total_clicks(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(total)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
