//! API Middleware (Rate Limiting, Logging)

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::handlers::AppState;
use super::types::{ApiError, ApiResponse};

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per window
    pub requests_per_window: u32,
    /// Window duration
    pub window_duration: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 60,                  // 60 analyses
            window_duration: Duration::from_secs(60), // per minute
        }
    }
}

/// In-memory fixed-window rate limiter keyed by client
pub struct RateLimiter {
    /// Request counts per client key
    requests: DashMap<String, (u32, Instant)>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            requests: DashMap::new(),
            config,
        }
    }

    /// Check if request is allowed, returns (allowed, remaining, reset_seconds)
    pub fn check(&self, key: &str) -> (bool, u32, u64) {
        let now = Instant::now();

        let mut entry = self.requests.entry(key.to_string()).or_insert((0, now));

        // Reset window if expired
        if now.duration_since(entry.1) > self.config.window_duration {
            entry.0 = 0;
            entry.1 = now;
        }

        let reset_secs = self
            .config
            .window_duration
            .saturating_sub(now.duration_since(entry.1))
            .as_secs();

        if entry.0 >= self.config.requests_per_window {
            return (false, 0, reset_secs);
        }

        entry.0 += 1;
        let remaining = self.config.requests_per_window - entry.0;
        (true, remaining, reset_secs)
    }

    /// Drop entries idle for two windows; returns how many were removed
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let before = self.requests.len();
        self.requests.retain(|_, (_, timestamp)| {
            now.duration_since(*timestamp) < self.config.window_duration * 2
        });
        before.saturating_sub(self.requests.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.requests.len()
    }

    pub fn window(&self) -> Duration {
        self.config.window_duration
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

/// Background task: prune idle rate-limit entries once per window
pub fn spawn_cleanup_task(limiter: Arc<RateLimiter>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(limiter.window());
        loop {
            interval.tick().await;
            let removed = limiter.cleanup();
            if removed > 0 {
                debug!("🧹 Rate limiter cleanup: {} idle clients removed", removed);
            }
        }
    })
}

fn is_health_path(path: &str) -> bool {
    path == "/health" || path == "/v1/health"
}

/// Client key: forwarded address, then the socket peer, then "unknown".
///
/// The peer is only known when the server was started with
/// `into_make_service_with_connect_info`.
fn client_key(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| peer.map(|ip| ip.to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    // Skip rate limiting for health check
    if is_health_path(request.uri().path()) {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let rate_key = client_key(&headers, peer);
    let (allowed, remaining, reset) = state.rate_limiter.check(&rate_key);

    if !allowed {
        warn!(key = %rate_key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ApiResponse::error(ApiError::rate_limited(reset), 0.0)),
        )
            .into_response();
    }

    let mut response = next.run(request).await;

    // Add rate limit headers
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-remaining", remaining.into());
    headers.insert("x-ratelimit-reset", reset.into());

    response
}

/// Request logging middleware; tags each response with a request id
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = uuid::Uuid::new_v4().to_string();

    let mut response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri.path(),
        status = %status.as_u16(),
        latency_ms = %latency.as_millis(),
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }

    response
}
