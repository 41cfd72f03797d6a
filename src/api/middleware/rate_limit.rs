// Per-client rate limiting for /api paths
// Fixed window: each client key gets `max` requests per window, then a
// fixed text refusal until the window rolls over.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Body sent with HTTP 429 once a client exhausts its quota
pub const RATE_LIMIT_MESSAGE: &str =
    "Too many requests from this IP, please try again in an hour!";

/// In-memory fixed-window rate limiter keyed by client
#[derive(Clone)]
pub struct RateLimiter {
    max: u32,
    window: Duration,
    buckets: Arc<Mutex<HashMap<String, (u32, Instant)>>>,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            buckets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Counts a request against `key`
    ///
    /// Returns `Some(remaining)` while the client is within quota, `None`
    /// once the quota for the current window is exhausted.
    pub fn check(&self, key: &str) -> Option<u32> {
        let mut buckets = self.buckets.lock().unwrap();
        let now = Instant::now();

        // Drop buckets whose window has rolled over
        buckets.retain(|_, (_, started)| now.duration_since(*started) < self.window);

        match buckets.get_mut(key) {
            Some((count, _)) => {
                if *count >= self.max {
                    None
                } else {
                    *count += 1;
                    Some(self.max - *count)
                }
            }
            None => {
                buckets.insert(key.to_string(), (1, now));
                Some(self.max - 1)
            }
        }
    }
}

/// Middleware applying the limiter to every /api request
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if !req.uri().path().starts_with("/api") {
        return next.run(req).await;
    }

    let key = client_key(&req);
    match limiter.check(&key) {
        None => (StatusCode::TOO_MANY_REQUESTS, RATE_LIMIT_MESSAGE).into_response(),
        Some(remaining) => {
            let mut response = next.run(req).await;
            let headers = response.headers_mut();
            if let Ok(value) = HeaderValue::from_str(&limiter.max().to_string()) {
                headers.insert(HeaderName::from_static("x-ratelimit-limit"), value);
            }
            if let Ok(value) = HeaderValue::from_str(&remaining.to_string()) {
                headers.insert(HeaderName::from_static("x-ratelimit-remaining"), value);
            }
            response
        }
    }
}

/// Picks the client key: first X-Forwarded-For hop, else peer address
fn client_key(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn allows_up_to_max_requests() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        assert_eq!(limiter.check("1.2.3.4"), Some(2));
        assert_eq!(limiter.check("1.2.3.4"), Some(1));
        assert_eq!(limiter.check("1.2.3.4"), Some(0));
        assert_eq!(limiter.check("1.2.3.4"), None);
    }

    #[test]
    fn keys_are_counted_independently() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.check("1.2.3.4").is_some());
        assert!(limiter.check("5.6.7.8").is_some());
        assert!(limiter.check("1.2.3.4").is_none());
    }

    #[test]
    fn window_rollover_resets_the_quota() {
        let limiter = RateLimiter::new(1, Duration::from_millis(10));

        assert!(limiter.check("1.2.3.4").is_some());
        assert!(limiter.check("1.2.3.4").is_none());

        std::thread::sleep(Duration::from_millis(20));
        assert!(limiter.check("1.2.3.4").is_some());
    }

    #[test]
    fn client_key_prefers_forwarded_header() {
        let req = axum::extract::Request::builder()
            .uri("/api/v1/tours")
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_key(&req), "203.0.113.7");
    }

    #[test]
    fn client_key_falls_back_to_unknown() {
        let req = axum::extract::Request::builder()
            .uri("/api/v1/tours")
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_key(&req), "unknown");
    }
}
