//! Per-client rate limiting for the API scope
//!
//! Fixed window counters keyed by client address, held in process memory.
//! Each worker shares the same counters through the `Arc` inside
//! [`RateLimiter`], so build it once and clone it into every app.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue, RETRY_AFTER},
    Error, HttpResponse,
};
use cg_shared::{error_codes, ErrorResponse};
use futures_util::future::LocalBoxFuture;
use std::{
    collections::HashMap,
    future::{ready, Ready},
    net::SocketAddr,
    rc::Rc,
    sync::{Arc, Mutex, PoisonError},
    task::{Context, Poll},
    time::{Duration, Instant},
};
use tracing::warn;

/// Tracked clients before expired windows are swept
const SWEEP_THRESHOLD: usize = 10_000;

const RATELIMIT_LIMIT: &str = "ratelimit-limit";
const RATELIMIT_REMAINING: &str = "ratelimit-remaining";

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per client per window
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum RateLimitStatus {
    Ok { remaining: u32 },
    Exceeded { retry_after: Duration },
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Rate limiter middleware factory
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count one request from `client` and report whether it may proceed
    pub fn check(&self, client: &str) -> RateLimitStatus {
        let now = Instant::now();
        let window_length = self.config.window;
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() >= SWEEP_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started) < window_length);
        }

        let window = windows.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= window_length {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.config.max_requests {
            return RateLimitStatus::Exceeded {
                retry_after: window_length.saturating_sub(now.duration_since(window.started)),
            };
        }

        window.count += 1;
        RateLimitStatus::Ok {
            remaining: self.config.max_requests - window.count,
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimiterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service: Rc::new(service),
            limiter: self.clone(),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimiterMiddleware<S> {
    service: Rc<S>,
    limiter: RateLimiter,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let client = client_key(&req);
        let status = self.limiter.check(&client);
        let limit = self.limiter.config.max_requests;

        Box::pin(async move {
            match status {
                RateLimitStatus::Ok { remaining } => {
                    let mut response = service.call(req).await?;
                    let headers = response.headers_mut();
                    headers.insert(
                        HeaderName::from_static(RATELIMIT_LIMIT),
                        HeaderValue::from(limit),
                    );
                    headers.insert(
                        HeaderName::from_static(RATELIMIT_REMAINING),
                        HeaderValue::from(remaining),
                    );
                    Ok(response.map_into_left_body())
                }
                RateLimitStatus::Exceeded { retry_after } => {
                    warn!(client = %client, path = %req.path(), "Rate limit exceeded");
                    let retry_secs = retry_after.as_secs().max(1);
                    let response = HttpResponse::TooManyRequests()
                        .insert_header((RETRY_AFTER, retry_secs))
                        .json(
                            ErrorResponse::new(
                                error_codes::RATE_LIMITED,
                                "Too many requests, please try again later",
                            )
                            .add_detail("retry_after_seconds", retry_secs),
                        );
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Client address, preferring proxy headers, without the port
fn client_key(req: &ServiceRequest) -> String {
    let info = req.connection_info();
    match info.realip_remote_addr() {
        Some(addr) => addr
            .parse::<SocketAddr>()
            .map(|socket| socket.ip().to_string())
            .unwrap_or_else(|_| addr.to_string()),
        None => "unknown".to_string(),
    }
}
