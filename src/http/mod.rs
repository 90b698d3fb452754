//! HTTP transport with retry and rate limiting
//!
//! The reporting API is POST-centric and enforces a per-company request
//! budget; this module provides a client that honors it with a token-bucket
//! limiter plus a 429/5xx retry loop.

mod client;
mod rate_limit;


pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
