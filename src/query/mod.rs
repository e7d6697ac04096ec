//! Query module
//!
//! The query collaborator the pagination controller fetches pages through,
//! plus a GraphQL-over-HTTP implementation with retry and rate limiting.
//!
//! # Features
//!
//! - **Injected Client**: `QueryClient` trait, shared as `Arc<dyn QueryClient>`
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Authentication**: Bearer, Basic and API key headers

mod auth;
mod client;
mod rate_limit;
mod types;

pub use auth::AuthConfig;
pub use client::{HttpClientConfig, HttpClientConfigBuilder, HttpQueryClient};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use types::{GraphqlError, GraphqlResponse, QueryClient, QueryRequest};
