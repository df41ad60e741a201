//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`          - Health check (public)
//! - `/api/auth/me*`         - Profile (session token)
//! - `/api/auth/api-keys*`   - API key management (session token)
//! - `/api/shorten`, `/api/history` - Links (session token or API key)
//! - `/api/auth/register`, `/api/auth/login`, `/api/metrics`,
//!   `/api/stats/{code}`, `/api/{code}` - Public
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Error detail** - Exposes internal error details in development
//! - **CORS** - Configured origin, or any origin when unset
//! - **Body limit** - Maximum JSON body size
//! - **Rate limiting** - Per-IP token bucket on `/api/*`
//! - **Authentication** - Session token and/or API key per route group
//!
//! Trailing-slash normalization wraps the router in [`crate::server`].

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::{self, RateLimit};
use crate::api::middleware::{auth, error_detail, tracing};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::BehindProxy;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::get;
use axum::{Extension, Router, middleware};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

/// Default maximum request body size (10 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Perimeter settings applied around the routes.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Per-IP budget on `/api/*`; `None` disables limiting (the limiter needs
    /// connect info, which in-process test servers do not provide).
    pub rate_limit: Option<RateLimit>,
    /// Allowed CORS origin; any origin when `None`.
    pub cors_origin: Option<String>,
    pub body_limit: usize,
    /// Put real messages of internal errors into response bodies.
    pub expose_internal_errors: bool,
    /// Trust `X-Forwarded-For` for the client address recorded on links.
    /// Enable only behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            rate_limit: None,
            cors_origin: None,
            body_limit: DEFAULT_BODY_LIMIT,
            expose_internal_errors: false,
            behind_proxy: false,
        }
    }
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `options` - perimeter settings (rate limit, CORS, body limit, error detail)
pub fn app_router(state: AppState, options: &RouterOptions) -> Router {
    let session_router = api::routes::session_routes().route_layer(
        middleware::from_fn_with_state(state.clone(), auth::session_layer),
    );

    let protected_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let mut api_router = Router::new()
        .merge(session_router)
        .merge(protected_router)
        .merge(api::routes::public_routes());

    if let Some(limiter) = options.rate_limit.as_ref().and_then(rate_limit::layer) {
        api_router = api_router.layer(limiter);
    }

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .fallback(fallback_handler)
        .with_state(state)
        .layer(Extension(BehindProxy(options.behind_proxy)))
        .layer(DefaultBodyLimit::max(options.body_limit))
        .layer(cors_layer(options.cors_origin.as_deref()))
        .layer(middleware::from_fn_with_state(
            options.expose_internal_errors,
            error_detail::layer,
        ))
        .layer(tracing::layer())
}

async fn fallback_handler() -> AppError {
    AppError::not_found("Route not found", json!({}))
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    };

    match HeaderValue::from_str(origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                HeaderName::from_static(auth::API_KEY_HEADER),
            ]),
        Err(e) => {
            ::tracing::warn!(error = %e, origin, "Invalid CORS origin, allowing any origin");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}
