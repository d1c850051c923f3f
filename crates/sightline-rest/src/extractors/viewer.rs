//! Viewer origin extractor.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::SocketAddr;

/// Header set by proxies with the client address chain.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
/// Header set by some proxies with the client address.
pub const X_REAL_IP: &str = "x-real-ip";

/// Network origin of the requester, used to deduplicate views.
///
/// Resolved from the first `X-Forwarded-For` entry, then `X-Real-IP`, then
/// the socket peer address. Absent when none is available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerOrigin(pub Option<String>);

impl ViewerOrigin {
    /// Resolves the origin from headers, falling back to `peer`.
    pub fn resolve(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let forwarded = header_value(headers, X_FORWARDED_FOR)
            .and_then(|value| value.split(',').next().map(str::trim))
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let origin = forwarded
            .or_else(|| header_value(headers, X_REAL_IP).map(str::to_string))
            .or_else(|| peer.map(|addr| addr.ip().to_string()));

        Self(origin)
    }

    /// Consumes the extractor, returning the origin.
    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for ViewerOrigin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(Self::resolve(&parts.headers, peer))
    }
}
