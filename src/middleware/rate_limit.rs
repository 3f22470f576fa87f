//! Rate limiting middleware.
//!
//! Fixed-window, in-memory rate limiting per client IP, applied to the
//! authentication endpoints.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Configuration for rate limiting.
#[derive(Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(15 * 60),
        }
    }
}

struct WindowEntry {
    count: u32,
    window_start: Instant,
}

/// Rate limiter state tracking request counts per IP.
///
/// The whole check-and-increment runs under one lock acquisition, so two
/// concurrent requests cannot both observe "under the limit" at the
/// boundary.
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    state: Arc<Mutex<HashMap<IpAddr, WindowEntry>>>,
}

/// Outcome of a limiter check.
pub enum RateLimitResult {
    Allowed,
    Exceeded { retry_after: Duration },
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check whether a request from `ip` should be allowed right now.
    pub fn check(&self, ip: IpAddr) -> RateLimitResult {
        self.check_at(ip, Instant::now())
    }

    /// Check against an explicit instant. Tests drive the window with this.
    pub fn check_at(&self, ip: IpAddr, now: Instant) -> RateLimitResult {
        let mut state = self.state.lock();

        let entry = state.entry(ip).or_insert(WindowEntry {
            count: 0,
            window_start: now,
        });

        // Window restart is unconditional once the reset instant passes,
        // regardless of rejections in the previous window.
        if now.duration_since(entry.window_start) >= self.config.window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.config.max_requests {
            let reset_at = entry.window_start + self.config.window;
            return RateLimitResult::Exceeded {
                retry_after: reset_at.saturating_duration_since(now),
            };
        }

        entry.count += 1;
        RateLimitResult::Allowed
    }

    /// Drop entries whose window is long past (call from a sweep if the
    /// address set ever grows unbounded).
    pub fn cleanup(&self) {
        let mut state = self.state.lock();
        let now = Instant::now();
        let window = self.config.window;

        state.retain(|_, entry| now.duration_since(entry.window_start) < window * 2);
    }
}

/// Rate limiting middleware function.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    // ConnectInfo is present when served with connect-info; router tests
    // drive requests without a socket and fall back to loopback.
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    match limiter.check(ip) {
        RateLimitResult::Allowed => next.run(request).await,
        RateLimitResult::Exceeded { retry_after } => {
            warn!(
                ip = %ip,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );

            let body = serde_json::json!({
                "error": "rate_limit_exceeded",
                "message": "Too many requests. Please try again later.",
                "retry_after_seconds": retry_after.as_secs(),
            });

            (
                StatusCode::TOO_MANY_REQUESTS,
                [("Retry-After", retry_after.as_secs().to_string())],
                axum::Json(body),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32, secs: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests: max,
            window: Duration::from_secs(secs),
        })
    }

    #[test]
    fn test_nth_allowed_nth_plus_one_rejected() {
        let limiter = limiter(5, 900);
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        let t0 = Instant::now();

        for _ in 0..5 {
            assert!(matches!(
                limiter.check_at(ip, t0),
                RateLimitResult::Allowed
            ));
        }
        assert!(matches!(
            limiter.check_at(ip, t0),
            RateLimitResult::Exceeded { .. }
        ));
    }

    #[test]
    fn test_window_reset_readmits() {
        let limiter = limiter(2, 900);
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        let t0 = Instant::now();

        assert!(matches!(limiter.check_at(ip, t0), RateLimitResult::Allowed));
        assert!(matches!(limiter.check_at(ip, t0), RateLimitResult::Allowed));
        assert!(matches!(
            limiter.check_at(ip, t0),
            RateLimitResult::Exceeded { .. }
        ));

        // Rejections do not extend the window; it restarts at count=1.
        let later = t0 + Duration::from_secs(900);
        assert!(matches!(
            limiter.check_at(ip, later),
            RateLimitResult::Allowed
        ));
        assert!(matches!(
            limiter.check_at(ip, later),
            RateLimitResult::Allowed
        ));
        assert!(matches!(
            limiter.check_at(ip, later),
            RateLimitResult::Exceeded { .. }
        ));
    }

    #[test]
    fn test_addresses_are_independent() {
        let limiter = limiter(1, 900);
        let t0 = Instant::now();
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        let b: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(matches!(limiter.check_at(a, t0), RateLimitResult::Allowed));
        assert!(matches!(
            limiter.check_at(a, t0),
            RateLimitResult::Exceeded { .. }
        ));
        assert!(matches!(limiter.check_at(b, t0), RateLimitResult::Allowed));
    }

    #[test]
    fn test_retry_after_counts_down() {
        let limiter = limiter(1, 900);
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        let t0 = Instant::now();

        limiter.check_at(ip, t0);
        match limiter.check_at(ip, t0 + Duration::from_secs(300)) {
            RateLimitResult::Exceeded { retry_after } => {
                assert_eq!(retry_after, Duration::from_secs(600));
            }
            _ => panic!("should be exceeded"),
        }
    }

    #[test]
    fn test_cleanup_retains_active_windows() {
        let limiter = limiter(5, 1);
        let ip: IpAddr = "10.0.0.1".parse().unwrap();

        limiter.check(ip);
        limiter.cleanup();
        assert_eq!(limiter.state.lock().len(), 1);
    }
}
