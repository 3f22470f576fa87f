//! Middleware for observability and abuse control.
//!
//! This module provides:
//! - Request logging with latency tracking
//! - Fixed-window rate limiting per IP address

pub mod logging;
pub mod rate_limit;

pub use logging::request_logging;
pub use rate_limit::{rate_limit_middleware, RateLimitConfig, RateLimiter};
