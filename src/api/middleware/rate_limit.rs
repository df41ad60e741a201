//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Per-IP request budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests allowed per window; also the burst size.
    pub max_requests: u32,
    /// Length of the window in seconds.
    pub window_seconds: u64,
}

impl RateLimit {
    /// Time needed to regain one request: `window / max_requests`.
    pub fn replenish_period(&self) -> Duration {
        let window_ms = self.window_seconds.saturating_mul(1000);
        Duration::from_millis((window_ms / u64::from(self.max_requests.max(1))).max(1))
    }
}

/// Creates a per-IP rate limiter for API endpoints.
///
/// # Limits
///
/// A client starts with `max_requests` tokens and regains one every
/// `window_seconds / max_requests`. With the defaults (100 per 900 s) that is
/// one request every 9 seconds after the initial burst of 100.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address, so the router must be served with connect info.
///
/// Returns `None` for a zero budget, which disables limiting.
///
/// # Example
///
/// ```rust,ignore
/// let limit = RateLimit { max_requests: 100, window_seconds: 900 };
/// let app = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .layer(rate_limit::layer(&limit).unwrap());
/// ```
pub fn layer(
    limit: &RateLimit,
) -> Option<GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    let governor_conf = GovernorConfigBuilder::default()
        .period(limit.replenish_period())
        .burst_size(limit.max_requests)
        .finish();

    match governor_conf {
        Some(conf) => Some(GovernorLayer::new(Arc::new(conf))),
        None => {
            tracing::warn!(?limit, "Invalid rate limit, limiting disabled");
            None
        }
    }
}
