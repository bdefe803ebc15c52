//! Rate limiting middleware using token bucket algorithm.

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer, governor::GovernorConfigBuilder, key_extractor::KeyExtractor,
};

use crate::utils::client_addr::client_ip;

/// Bucket shared by requests with no resolvable client address.
const UNKNOWN_CLIENT: &str = "unknown";

type ClientGovernorLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Keys rate limits by client IP.
///
/// Uses the same resolution as view tracking: forwarding headers when
/// `behind_proxy` is set, the socket peer otherwise. Requests without any
/// address (routers served without connect info) share one bucket instead
/// of failing.
#[derive(Debug, Clone, Copy)]
pub struct ClientIpKeyExtractor {
    behind_proxy: bool,
}

impl ClientIpKeyExtractor {
    pub fn new(behind_proxy: bool) -> Self {
        Self { behind_proxy }
    }
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = String;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let peer = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(client_ip(req.headers(), peer, self.behind_proxy)
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string()))
    }
}

/// Creates a rate limiter for public endpoints.
///
/// # Limits
///
/// - **Rate**: 20 requests per second
/// - **Burst**: 200 requests
///
/// A page load fetches the ad list and posts a view for each rendered ad,
/// so the bucket is sized for bursts of tracking calls from one client.
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/view/{id}", post(view_handler))
///     .layer(rate_limit::layer(false));
/// ```
pub fn layer(behind_proxy: bool) -> ClientGovernorLayer {
    build(behind_proxy, 20, 200)
}

/// Creates a stricter rate limiter for admin endpoints.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 20 requests
///
/// Also slows down guessing of the admin key.
pub fn secure_layer(behind_proxy: bool) -> ClientGovernorLayer {
    build(behind_proxy, 1, 20)
}

fn build(behind_proxy: bool, per_second: u64, burst_size: u32) -> ClientGovernorLayer {
    let mut builder =
        GovernorConfigBuilder::default().key_extractor(ClientIpKeyExtractor::new(behind_proxy));
    builder.per_second(per_second).burst_size(burst_size);

    // Only fails for a zero period or burst, which the callers above rule out.
    let governor_conf = match builder.finish() {
        Some(conf) => Arc::new(conf),
        None => unreachable!("rate limit period and burst are non-zero"),
    };

    GovernorLayer::new(governor_conf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_key_from_forwarded_header_behind_proxy() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();

        let key = ClientIpKeyExtractor::new(true).extract(&req).unwrap();
        assert_eq!(key, "203.0.113.7");
    }

    #[test]
    fn test_forwarded_header_ignored_without_proxy() {
        let mut req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo("192.0.2.10:4000".parse::<SocketAddr>().unwrap()));

        let key = ClientIpKeyExtractor::new(false).extract(&req).unwrap();
        assert_eq!(key, "192.0.2.10");
    }

    #[test]
    fn test_unknown_client_shares_bucket() {
        let req = Request::builder().body(Body::empty()).unwrap();

        let key = ClientIpKeyExtractor::new(false).extract(&req).unwrap();
        assert_eq!(key, UNKNOWN_CLIENT);
    }
}
