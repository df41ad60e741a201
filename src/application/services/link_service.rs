//! Link creation, redirect counting and reporting service.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, UserRepository};
use crate::error::AppError;
use crate::utils::code_generator::generate_code;
use crate::utils::qr_code::render_data_uri;
use crate::utils::request_origin::RequestOrigin;
use crate::utils::url_validator::validate_url;

/// Attempts at finding a free code before giving up.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Result of a shorten request.
#[derive(Debug, Clone)]
pub struct ShortenOutcome {
    pub link: Link,
    /// `false` when the owner already had a link for this URL.
    pub created: bool,
}

/// Aggregate usage counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UsageMetrics {
    pub total_users: i64,
    pub total_urls: i64,
    pub total_clicks: i64,
}

/// Service for creating short links and serving them.
///
/// Handles URL validation, per-owner deduplication, code generation with
/// collision retry and QR rendering.
pub struct LinkService<L, U>
where
    L: LinkRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    links: Arc<L>,
    users: Arc<U>,
    base_url: String,
}

impl<L, U> LinkService<L, U>
where
    L: LinkRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    /// Creates a new link service.
    ///
    /// # Arguments
    ///
    /// - `links` - link repository
    /// - `users` - user repository, only used for metrics
    /// - `base_url` - prefix of every short URL, e.g. `http://localhost:3000/api`
    pub fn new(links: Arc<L>, users: Arc<U>, base_url: impl Into<String>) -> Self {
        Self {
            links,
            users,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Composes the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// Shortens a URL for an owner.
    ///
    /// # Deduplication
    ///
    /// If the owner already has a link for exactly this string, that link is
    /// returned with `created == false`. A concurrent request that inserts the
    /// same URL first is resolved the same way.
    ///
    /// # Code Generation
    ///
    /// Generates a random 8-character code and inserts without overwriting;
    /// on collision a new code is drawn, up to 10 attempts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an absolute http(s) URL.
    /// Returns [`AppError::Internal`] if no free code was found or on store errors.
    pub async fn shorten(
        &self,
        original_url: &str,
        owner: i64,
        origin: RequestOrigin,
    ) -> Result<ShortenOutcome, AppError> {
        validate_url(original_url).map_err(|e| {
            AppError::bad_request(
                "Invalid URL format. Please provide a valid URL.",
                json!({ "reason": e.to_string() }),
            )
        })?;

        if let Some(link) = self
            .links
            .find_by_owner_and_url(owner, original_url)
            .await?
        {
            tracing::debug!(code = %link.url_code, "URL already shortened by owner");
            return Ok(ShortenOutcome {
                link,
                created: false,
            });
        }

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_code()?;
            let short_url = self.short_url(&code);
            let qr_code = render_data_uri(&short_url)?;

            let new_link = NewLink {
                original_url: original_url.to_string(),
                url_code: code,
                short_url,
                qr_code,
                ip_address: origin.ip_address.clone(),
                user_agent: origin.user_agent.clone(),
                user_id: Some(owner),
            };

            match self.links.insert(new_link).await {
                Ok(Some(link)) => {
                    metrics::counter!("linfy_links_created_total").increment(1);
                    tracing::info!(code = %link.url_code, owner, "Short link created");
                    return Ok(ShortenOutcome {
                        link,
                        created: true,
                    });
                }
                Ok(None) => {
                    tracing::warn!(attempt, "Short code collision, retrying");
                }
                Err(AppError::Conflict { .. }) => {
                    return self
                        .links
                        .find_by_owner_and_url(owner, original_url)
                        .await?
                        .map(|link| ShortenOutcome {
                            link,
                            created: false,
                        })
                        .ok_or_else(|| {
                            AppError::internal(
                                "Link vanished after duplicate insert",
                                json!({ "owner": owner }),
                            )
                        });
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Counts a visit and returns the link to redirect to.
    ///
    /// The increment is a single atomic store operation; an unknown code
    /// changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn redirect(&self, code: &str) -> Result<Link, AppError> {
        let link = self
            .links
            .record_click(code)
            .await?
            .ok_or_else(|| url_not_found(code))?;

        metrics::counter!("linfy_redirects_total").increment(1);
        tracing::debug!(code, clicks = link.clicks, "Redirect recorded");

        Ok(link)
    }

    /// Lists the owner's links, newest first.
    pub async fn history(&self, owner: i64) -> Result<Vec<Link>, AppError> {
        self.links.list_by_owner(owner).await
    }

    /// Returns the full record for a code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn stats(&self, code: &str) -> Result<Link, AppError> {
        self.links
            .find_by_code(code)
            .await?
            .ok_or_else(|| url_not_found(code))
    }

    /// Computes aggregate counters on demand.
    pub async fn metrics(&self) -> Result<UsageMetrics, AppError> {
        Ok(UsageMetrics {
            total_users: self.users.count().await?,
            total_urls: self.links.count().await?,
            total_clicks: self.links.total_clicks().await?,
        })
    }

    /// Checks that the link store answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.links.ping().await
    }
}

fn url_not_found(code: &str) -> AppError {
    AppError::not_found("URL not found", json!({ "code": code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockLinkRepository, MockUserRepository};
    use chrono::Utc;

    const BASE: &str = "http://localhost:3000/api";

    fn stored_link(id: i64, code: &str, url: &str, owner: i64) -> Link {
        NewLink {
            original_url: url.to_string(),
            url_code: code.to_string(),
            short_url: format!("{BASE}/{code}"),
            qr_code: "data:image/svg+xml;base64,AAAA".to_string(),
            ip_address: None,
            user_agent: None,
            user_id: Some(owner),
        }
        .into_link(id, Utc::now())
    }

    fn service(
        links: MockLinkRepository,
        users: MockUserRepository,
    ) -> LinkService<MockLinkRepository, MockUserRepository> {
        LinkService::new(Arc::new(links), Arc::new(users), BASE)
    }

    #[tokio::test]
    async fn test_shorten_creates_link() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_owner_and_url()
            .times(1)
            .returning(|_, _| Ok(None));
        links
            .expect_insert()
            .withf(|l| {
                l.url_code.len() == 8
                    && l.short_url == format!("{BASE}/{}", l.url_code)
                    && l.qr_code.starts_with("data:image/svg+xml;base64,")
                    && l.user_id == Some(1)
                    && l.ip_address.as_deref() == Some("10.0.0.1")
            })
            .times(1)
            .returning(|l| Ok(Some(l.into_link(5, Utc::now()))));

        let service = service(links, MockUserRepository::new());
        let origin = RequestOrigin {
            ip_address: Some("10.0.0.1".to_string()),
            user_agent: None,
        };

        let outcome = service
            .shorten("https://example.com", 1, origin)
            .await
            .unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.link.id, 5);
        assert_eq!(outcome.link.clicks, 0);
        assert!(outcome.link.short_url.ends_with(&format!("/{}", outcome.link.url_code)));
    }

    #[tokio::test]
    async fn test_shorten_returns_existing_for_same_owner() {
        let mut links = MockLinkRepository::new();
        let existing = stored_link(3, "abcd1234", "https://example.com", 1);
        links
            .expect_find_by_owner_and_url()
            .withf(|owner, url| *owner == 1 && url == "https://example.com")
            .times(1)
            .returning(move |_, _| Ok(Some(existing.clone())));
        links.expect_insert().times(0);

        let service = service(links, MockUserRepository::new());

        let outcome = service
            .shorten("https://example.com", 1, RequestOrigin::default())
            .await
            .unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.link.id, 3);
    }

    #[tokio::test]
    async fn test_shorten_rejects_invalid_url() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_owner_and_url().times(0);
        links.expect_insert().times(0);

        let service = service(links, MockUserRepository::new());

        for url in ["", "example.com", "javascript:alert(1)", "ftp://example.com"] {
            let result = service.shorten(url, 1, RequestOrigin::default()).await;
            assert!(matches!(result, Err(AppError::Validation { .. })), "{url}");
        }
    }

    #[tokio::test]
    async fn test_shorten_retries_on_code_collision() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_owner_and_url()
            .returning(|_, _| Ok(None));

        let mut seq = mockall::Sequence::new();
        links
            .expect_insert()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        links
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|l| Ok(Some(l.into_link(8, Utc::now()))));

        let service = service(links, MockUserRepository::new());

        let outcome = service
            .shorten("https://example.com", 1, RequestOrigin::default())
            .await
            .unwrap();

        assert_eq!(outcome.link.id, 8);
    }

    #[tokio::test]
    async fn test_shorten_gives_up_after_max_attempts() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_owner_and_url()
            .returning(|_, _| Ok(None));
        links
            .expect_insert()
            .times(MAX_CODE_ATTEMPTS)
            .returning(|_| Ok(None));

        let service = service(links, MockUserRepository::new());

        let result = service
            .shorten("https://example.com", 1, RequestOrigin::default())
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_shorten_resolves_concurrent_duplicate() {
        let mut links = MockLinkRepository::new();
        let winner = stored_link(11, "winner01", "https://example.com", 1);

        let mut seq = mockall::Sequence::new();
        links
            .expect_find_by_owner_and_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        links
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": "links_owner_url_key" }),
                ))
            });
        links
            .expect_find_by_owner_and_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _| Ok(Some(winner.clone())));

        let service = service(links, MockUserRepository::new());

        let outcome = service
            .shorten("https://example.com", 1, RequestOrigin::default())
            .await
            .unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.link.url_code, "winner01");
    }

    #[tokio::test]
    async fn test_redirect_unknown_code() {
        let mut links = MockLinkRepository::new();
        links
            .expect_record_click()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(links, MockUserRepository::new());

        let result = service.redirect("missing1").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_redirect_returns_counted_link() {
        let mut links = MockLinkRepository::new();
        links.expect_record_click().times(1).returning(|code| {
            let mut link = stored_link(1, code, "https://example.com", 1);
            link.clicks = 1;
            Ok(Some(link))
        });

        let service = service(links, MockUserRepository::new());

        let link = service.redirect("abcd1234").await.unwrap();

        assert_eq!(link.clicks, 1);
        assert_eq!(link.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_stats_not_found() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_code().returning(|_| Ok(None));

        let service = service(links, MockUserRepository::new());

        assert!(matches!(
            service.stats("missing1").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_metrics_aggregates_counts() {
        let mut links = MockLinkRepository::new();
        links.expect_count().returning(|| Ok(4));
        links.expect_total_clicks().returning(|| Ok(17));

        let mut users = MockUserRepository::new();
        users.expect_count().returning(|| Ok(2));

        let service = service(links, users);

        assert_eq!(
            service.metrics().await.unwrap(),
            UsageMetrics {
                total_users: 2,
                total_urls: 4,
                total_clicks: 17,
            }
        );
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let service = LinkService::new(
            Arc::new(MockLinkRepository::new()),
            Arc::new(MockUserRepository::new()),
            "https://s.example.com/api/",
        );

        assert_eq!(
            service.short_url("abcd1234"),
            "https://s.example.com/api/abcd1234"
        );
    }
}
