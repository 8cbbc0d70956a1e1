//! Fixed-window rate limiting for the credential endpoints
//!
//! Each client gets `max_requests` per window. Clients are keyed by the
//! peer address of the connection. With `trust_proxy_headers` set, the
//! `x-real-ip` header, then the first `x-forwarded-for` hop, take precedence.

use crate::config::RateLimitConfig;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Requests seen from one client in the current window
#[derive(Debug)]
struct RateLimitEntry {
    requests: u32,
    window_start: Instant,
}

/// Shared per-client request counter
#[derive(Clone)]
pub struct RateLimiter {
    entries: Arc<DashMap<String, RateLimitEntry>>,
    enabled: bool,
    max_requests: u32,
    window: Duration,
    trust_proxy_headers: bool,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            enabled: config.enabled,
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs),
            trust_proxy_headers: config.trust_proxy_headers,
        }
    }

    /// Count one request from `client`; `false` once the budget is spent
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> bool {
        if !self.enabled {
            return true;
        }

        let mut entry = self
            .entries
            .entry(client.to_string())
            .or_insert_with(|| RateLimitEntry {
                requests: 0,
                window_start: now,
            });

        if now.saturating_duration_since(entry.window_start) >= self.window {
            entry.requests = 0;
            entry.window_start = now;
        }

        if entry.requests >= self.max_requests {
            return false;
        }

        entry.requests += 1;
        true
    }

    #[inline]
    pub fn trusts_proxy_headers(&self) -> bool {
        self.trust_proxy_headers
    }

    /// Drop entries whose window has passed
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.window_start) < self.window);
    }
}

/// Client key for rate limiting
///
/// Proxy headers are only read when `trust_proxy_headers` is set. Without
/// a peer address (no connect info) every request shares one key.
pub fn client_key(headers: &HeaderMap, peer: Option<IpAddr>, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(ip) = forwarded_client(headers) {
            return ip;
        }
    }

    peer.map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_client(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "x-real-ip")
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or_else(|| {
            header_str(headers, "x-forwarded-for")
                .and_then(|list| list.split(',').next())
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
        })
        .map(str::to_string)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|h| h.to_str().ok())
}

/// Rate limiter middleware
///
/// The server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()` for per-peer keys.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let limiter = state.rate_limiter();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let client = client_key(request.headers(), peer, limiter.trusts_proxy_headers());

    if !limiter.check(&client) {
        warn!(client = %client, path = %request.uri().path(), "Rate limit exceeded");
        return Err(ApiError::TooManyRequests(
            "Too many requests, please try again later".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            enabled: true,
            max_requests,
            window_secs,
            trust_proxy_headers: false,
        })
    }

    #[test]
    fn test_budget_per_client() {
        let limiter = limiter(2, 60);
        assert!(limiter.check("1.1.1.1"));
        assert!(limiter.check("1.1.1.1"));
        assert!(!limiter.check("1.1.1.1"));

        // Other clients have their own budget
        assert!(limiter.check("2.2.2.2"));
    }

    #[test]
    fn test_window_resets() {
        let limiter = limiter(1, 60);
        let start = Instant::now();
        assert!(limiter.check_at("c", start));
        assert!(!limiter.check_at("c", start + Duration::from_secs(30)));
        assert!(limiter.check_at("c", start + Duration::from_secs(60)));
    }

    #[test]
    fn test_disabled_limiter_allows_everything() {
        let limiter = RateLimiter::new(&RateLimitConfig {
            enabled: false,
            max_requests: 0,
            window_secs: 60,
            trust_proxy_headers: false,
        });
        for _ in 0..10 {
            assert!(limiter.check("c"));
        }
    }

    #[test]
    fn test_purge_keeps_active_windows() {
        let active = limiter(5, 60);
        active.check("c");
        active.purge_expired();
        assert_eq!(active.entries.len(), 1);

        let short = limiter(5, 0);
        short.check("c");
        short.purge_expired();
        assert!(short.entries.is_empty());
    }

    #[test]
    fn test_client_key_uses_peer_address() {
        let peer: IpAddr = "203.0.113.7".parse().unwrap();
        let headers = HeaderMap::new();

        assert_eq!(client_key(&headers, Some(peer), false), "203.0.113.7");
        assert_eq!(client_key(&headers, None, false), "unknown");
    }

    #[test]
    fn test_proxy_headers_ignored_unless_trusted() {
        let peer: IpAddr = "203.0.113.7".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.5"));

        assert_eq!(client_key(&headers, Some(peer), false), "203.0.113.7");
        assert_eq!(client_key(&headers, Some(peer), true), "192.168.1.5");
    }

    #[test]
    fn test_trusted_proxy_header_precedence() {
        let peer: IpAddr = "203.0.113.7".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(client_key(&headers, Some(peer), true), "203.0.113.7");

        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1, 10.0.0.2"));
        assert_eq!(client_key(&headers, Some(peer), true), "10.0.0.1");

        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.5"));
        assert_eq!(client_key(&headers, Some(peer), true), "192.168.1.5");
    }
}
