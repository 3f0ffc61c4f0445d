//! Client metadata extractor
//!
//! The device is the `User-Agent`; the address is the first `X-Forwarded-For`
//! hop, falling back to the peer address.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use habits_service::ClientInfo;

const UNKNOWN: &str = "unknown";

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .map(str::trim)
        .find(|hop| !hop.is_empty())
        .map(String::from)
}

#[derive(Debug, Clone)]
pub struct ClientMeta(pub ClientInfo);

#[async_trait]
impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let device = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(UNKNOWN)
            .to_string();

        let ip_address = forwarded_for(&parts.headers)
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| UNKNOWN.to_string());

        Ok(ClientMeta(ClientInfo { device, ip_address }))
    }
}
