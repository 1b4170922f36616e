use axum::http::Request;
use std::net::IpAddr;
use tower_governor::{key_extractor::KeyExtractor, GovernorError};

/// IP key extractor that works behind a reverse proxy and inside Docker.
/// Tries X-Forwarded-For, then the peer address, then falls back to localhost
/// so every unidentifiable client shares one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackIpKeyExtractor;

impl KeyExtractor for FallbackIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        // First IP in the X-Forwarded-For chain is the original client
        if let Some(xff) = req.headers().get("x-forwarded-for") {
            if let Ok(xff_str) = xff.to_str() {
                if let Some(ip) = xff_str
                    .split(',')
                    .next()
                    .and_then(|s| s.trim().parse::<IpAddr>().ok())
                {
                    return Ok(ip);
                }
            }
        }

        if let Some(connect_info) = req
            .extensions()
            .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        {
            return Ok(connect_info.0.ip());
        }

        Ok(IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)))
    }
}
