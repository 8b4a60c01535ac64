//! Per-client request quota, keyed by IP address.

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota};

/// Idle clients are forgotten once this many are tracked.
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    /// Rejected; the next request from this client is admitted after `retry_after`.
    Limited { retry_after: Duration },
}

pub struct RateLimiter {
    limit: u32,
    /// `None` when limiting is disabled.
    inner: Option<DefaultKeyedRateLimiter<IpAddr>>,
    clock: DefaultClock,
}

impl RateLimiter {
    /// Allow `limit` requests per client per minute, bursting up to `limit`.
    ///
    /// `limit == 0` disables limiting.
    pub fn per_minute(limit: u32) -> Self {
        let inner = NonZeroU32::new(limit)
            .map(|n| governor::RateLimiter::keyed(Quota::per_minute(n)));
        Self {
            limit,
            inner,
            clock: DefaultClock::default(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub fn check(&self, client: IpAddr) -> Decision {
        let Some(limiter) = &self.inner else {
            return Decision::Allowed;
        };

        if limiter.len() > MAX_TRACKED_CLIENTS {
            limiter.retain_recent();
        }

        match limiter.check_key(&client) {
            Ok(()) => Decision::Allowed,
            Err(not_until) => Decision::Limited {
                retry_after: not_until.wait_time_from(self.clock.now()),
            },
        }
    }
}
