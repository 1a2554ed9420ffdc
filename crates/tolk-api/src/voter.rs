use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use std::convert::Infallible;
use std::net::SocketAddr;

/// Weak voter identifier: the client-reported address.
///
/// Taken from the first `X-Forwarded-For` entry, else the peer address.
/// Not authenticated; anyone can claim any address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoterIdentity(pub String);

pub const UNKNOWN_VOTER: &str = "unknown";

#[async_trait]
impl<S> FromRequestParts<S> for VoterIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        if let Some(address) = forwarded {
            return Ok(VoterIdentity(address.to_string()));
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(VoterIdentity(peer.unwrap_or_else(|| UNKNOWN_VOTER.to_string())))
    }
}
