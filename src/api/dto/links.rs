//! DTOs for shortening, history, stats and metrics endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use crate::application::services::UsageMetrics;
use crate::domain::entities::Link;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The URL to shorten; must be an absolute http(s) URL. Its length is
    /// bounded only by the request body limit.
    #[serde(default)]
    pub original_url: String,
}

/// Envelope used by link endpoints: `{success, data, message?}`.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// Full link record, as returned by shorten and stats.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkView {
    pub id: i64,
    pub original_url: String,
    pub url_code: String,
    pub short_url: String,
    pub qr_code: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub user_id: Option<i64>,
}

impl From<Link> for LinkView {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url,
            url_code: link.url_code,
            short_url: link.short_url,
            qr_code: link.qr_code,
            clicks: link.clicks,
            created_at: link.created_at,
            last_accessed: link.last_accessed,
            ip_address: link.ip_address,
            user_agent: link.user_agent,
            user_id: link.user_id,
        }
    }
}

/// History entry: the link without provenance fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: i64,
    pub original_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
    pub qr_code: String,
}

impl From<Link> for HistoryItem {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url,
            short_url: link.short_url,
            created_at: link.created_at,
            clicks: link.clicks,
            qr_code: link.qr_code,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub total_users: i64,
    pub total_urls: i64,
    pub total_clicks: i64,
}

impl From<UsageMetrics> for MetricsResponse {
    fn from(m: UsageMetrics) -> Self {
        Self {
            total_users: m.total_users,
            total_urls: m.total_urls,
            total_clicks: m.total_clicks,
        }
    }
}
