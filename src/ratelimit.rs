//! Pacing for requests to the timetable API.
//!
//! A whole term's weeks are requested at once. The first few go out
//! immediately; after that, sends are released one per interval.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter as GovernorRateLimiter};
use nonzero_ext::nonzero;
use std::{num::NonZeroU32, time::Duration};

const SEND_INTERVAL: Duration = Duration::from_millis(50);
const BURST: NonZeroU32 = nonzero!(4u32);
const FALLBACK_PER_SEC: NonZeroU32 = nonzero!(20u32);

pub struct RateLimiter {
    limiter: DefaultDirectRateLimiter,
}

impl RateLimiter {
    pub fn new() -> Self {
        let quota = Quota::with_period(SEND_INTERVAL)
            .unwrap_or_else(|| Quota::per_second(FALLBACK_PER_SEC))
            .allow_burst(BURST);
        RateLimiter {
            limiter: GovernorRateLimiter::direct(quota),
        }
    }

    pub async fn wait_until_ready(&self) {
        self.limiter.until_ready().await;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_passes_then_holds() {
        let rate_limiter = RateLimiter::new();
        for _ in 0..BURST.get() {
            assert!(rate_limiter.limiter.check().is_ok());
        }
        assert!(rate_limiter.limiter.check().is_err());
    }

    #[tokio::test]
    async fn waiting_releases_after_the_interval() {
        let rate_limiter = RateLimiter::new();
        for _ in 0..BURST.get() {
            rate_limiter.wait_until_ready().await;
        }
        let started = std::time::Instant::now();
        rate_limiter.wait_until_ready().await;
        assert!(started.elapsed() >= SEND_INTERVAL / 2);
    }
}
