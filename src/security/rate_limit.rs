//! Per-IP rate limiting middleware.
//!
//! A fixed counting window per requester: `max` requests per `window_ms`
//! per client IP. Rejected requests get a 429 and never touch storage.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::context;
use crate::error::AppError;

struct Window {
    started: Instant,
    count: u32,
}

/// Shared state for the rate limiter.
pub struct RateLimiterState {
    windows: DashMap<String, Window>,
    window: Duration,
    max: u32,
    enabled: bool,
}

impl RateLimiterState {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            window: Duration::from_millis(config.window_ms),
            max: config.max,
            enabled: config.enabled,
        }
    }

    /// Admit or reject one request for the given key.
    pub fn check(&self, key: &str) -> bool {
        if !self.enabled {
            return true;
        }
        let now = Instant::now();
        let mut entry = self.windows.entry(key.to_string()).or_insert_with(|| Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        if entry.count < self.max {
            entry.count += 1;
            true
        } else {
            false
        }
    }

    /// Drop windows that have fully expired. Called periodically so idle
    /// keys do not accumulate.
    pub fn sweep(&self) {
        let now = Instant::now();
        let window = self.window;
        self.windows
            .retain(|_, w| now.duration_since(w.started) < window);
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Middleware gating /check. The key uses the same IP precedence as the
/// context extractor.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = context::client_ip(request.headers(), Some(addr));
    if state.check(&key) {
        next.run(request).await
    } else {
        tracing::warn!(client = %key, "rate limit exceeded");
        AppError::RateLimited.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(window_ms: u64, max: u32) -> RateLimiterState {
        RateLimiterState::new(&RateLimitConfig {
            enabled: true,
            window_ms,
            max,
        })
    }

    #[test]
    fn admits_up_to_max_then_rejects() {
        let state = limiter(60_000, 3);
        assert!(state.check("1.1.1.1"));
        assert!(state.check("1.1.1.1"));
        assert!(state.check("1.1.1.1"));
        assert!(!state.check("1.1.1.1"));
        // Other keys are unaffected.
        assert!(state.check("2.2.2.2"));
    }

    #[test]
    fn window_expiry_resets_the_count() {
        let state = limiter(30, 1);
        assert!(state.check("1.1.1.1"));
        assert!(!state.check("1.1.1.1"));
        std::thread::sleep(Duration::from_millis(40));
        assert!(state.check("1.1.1.1"));
    }

    #[test]
    fn disabled_limiter_admits_everything() {
        let state = RateLimiterState::new(&RateLimitConfig {
            enabled: false,
            window_ms: 1,
            max: 1,
        });
        for _ in 0..100 {
            assert!(state.check("1.1.1.1"));
        }
    }

    #[test]
    fn sweep_drops_expired_windows() {
        let state = limiter(30, 5);
        state.check("1.1.1.1");
        state.check("2.2.2.2");
        assert_eq!(state.windows.len(), 2);
        std::thread::sleep(Duration::from_millis(40));
        state.sweep();
        assert_eq!(state.windows.len(), 0);
    }
}
