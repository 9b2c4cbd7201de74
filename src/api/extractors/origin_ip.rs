//! Origin address extractor for the audit trail.
//!
//! Prefers proxy headers, falls back to the socket peer address.

use std::net::SocketAddr;

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};

use crate::errors::AppError;

/// Best-effort client address recorded alongside every audit entry.
pub struct OriginIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for OriginIp
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(forwarded) = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
        {
            // First hop is the original client
            if let Some(client) = forwarded.split(',').next() {
                let client = client.trim();
                if !client.is_empty() {
                    return Ok(OriginIp(client.to_string()));
                }
            }
        }
        if let Some(real_ip) = parts.headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
            let real_ip = real_ip.trim();
            if !real_ip.is_empty() {
                return Ok(OriginIp(real_ip.to_string()));
            }
        }
        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            return Ok(OriginIp(addr.ip().to_string()));
        }
        Ok(OriginIp("unknown".to_string()))
    }
}
