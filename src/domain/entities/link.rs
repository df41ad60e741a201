//! Link entity representing a shortened URL.

use chrono::{DateTime, Utc};

/// A shortened URL with its QR code and click counter.
///
/// `original_url` is stored exactly as submitted; per-owner deduplication
/// compares it by string equality.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub original_url: String,
    pub url_code: String,
    pub short_url: String,
    /// `data:` URI of the rendered QR image of `short_url`.
    pub qr_code: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub user_id: Option<i64>,
}

impl Link {
    /// Returns true if the link belongs to the given user.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == Some(user_id)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub original_url: String,
    pub url_code: String,
    pub short_url: String,
    pub qr_code: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub user_id: Option<i64>,
}

impl NewLink {
    /// Materializes the new link with a freshly assigned id.
    ///
    /// Used by stores that assign ids themselves.
    pub fn into_link(self, id: i64, now: DateTime<Utc>) -> Link {
        Link {
            id,
            original_url: self.original_url,
            url_code: self.url_code,
            short_url: self.short_url,
            qr_code: self.qr_code,
            clicks: 0,
            created_at: now,
            last_accessed: now,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            user_id: self.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_link() -> NewLink {
        NewLink {
            original_url: "https://example.com".to_string(),
            url_code: "abcd1234".to_string(),
            short_url: "http://localhost:3000/api/abcd1234".to_string(),
            qr_code: "data:image/svg+xml;base64,AAAA".to_string(),
            ip_address: Some("127.0.0.1".to_string()),
            user_agent: None,
            user_id: Some(3),
        }
    }

    #[test]
    fn test_into_link_starts_with_zero_clicks() {
        let now = Utc::now();
        let link = new_link().into_link(42, now);

        assert_eq!(link.id, 42);
        assert_eq!(link.clicks, 0);
        assert_eq!(link.created_at, now);
        assert_eq!(link.last_accessed, now);
        assert_eq!(link.url_code, "abcd1234");
        assert_eq!(link.ip_address.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_is_owned_by() {
        let link = new_link().into_link(1, Utc::now());

        assert!(link.is_owned_by(3));
        assert!(!link.is_owned_by(4));
    }
}
