//! Request provenance (client IP and user agent) extraction.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{HeaderMap, header, request::Parts};
use std::convert::Infallible;
use std::net::SocketAddr;

/// Where a request came from, recorded on links at creation time.
///
/// Both fields are best effort: they are `None` when the information is not
/// available (e.g. in tests without a socket) rather than failing the request.
/// `X-Forwarded-For` is only read when the router installs [`BehindProxy`]`(true)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Whether `X-Forwarded-For` may be trusted for the client address.
///
/// Installed by the router as a request extension; absent means untrusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BehindProxy(pub bool);

impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let behind_proxy = parts
            .extensions
            .get::<BehindProxy>()
            .is_some_and(|BehindProxy(trusted)| *trusted);

        Ok(Self::from_headers(&parts.headers, peer, behind_proxy))
    }
}

impl RequestOrigin {
    /// Builds the origin from headers and the peer socket address.
    ///
    /// With `behind_proxy`, the first `X-Forwarded-For` entry takes priority
    /// over the peer address. Otherwise the header is ignored, since any client
    /// can set it.
    pub fn from_headers(
        headers: &HeaderMap,
        peer: Option<SocketAddr>,
        behind_proxy: bool,
    ) -> Self {
        let forwarded = headers
            .get("x-forwarded-for")
            .filter(|_| behind_proxy)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let ip_address = forwarded.or_else(|| peer.map(|addr| addr.ip().to_string()));

        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            ip_address,
            user_agent,
        }
    }
}
