//! Outgoing query throttling
//!
//! One governor token bucket per client. Clones of a limiter draw from the
//! same bucket.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Query rate for a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Sustained queries per second
    pub requests_per_second: u32,
    /// Queries allowed back to back before throttling starts
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::per_second(10)
    }
}

impl RateLimiterConfig {
    /// Rate with an explicit burst
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }

    /// Rate whose burst equals one second of queries
    pub fn per_second(requests_per_second: u32) -> Self {
        Self::new(requests_per_second, requests_per_second)
    }

    /// Governor quota; zero values clamp to one
    pub fn quota(&self) -> Quota {
        let rate = NonZeroU32::new(self.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN);
        Quota::per_second(rate).allow_burst(burst)
    }
}

/// Token bucket gating [`HttpQueryClient`](super::HttpQueryClient) requests
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<DefaultDirectRateLimiter>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    /// Create a limiter for a rate
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            bucket: Arc::new(Governor::direct(config.quota())),
            config: *config,
        }
    }

    /// Rate this limiter enforces
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Take a token, waiting for one if the bucket is empty
    ///
    /// Returns how long the caller was held back.
    pub async fn acquire(&self) -> Duration {
        if self.bucket.check().is_ok() {
            return Duration::ZERO;
        }

        let started = Instant::now();
        self.bucket.until_ready().await;
        let waited = started.elapsed();
        debug!(
            "Query throttled at {} req/s for {:?}",
            self.config.requests_per_second, waited
        );
        waited
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
