//! Per-second request ceiling.
//!
//! The [`RateLimiter`] caps how many requests one client starts within a
//! single wall-clock second (epoch-second granularity). When the ceiling is
//! reached, the next request waits for the following second. It is an
//! in-process, per-client limiter; separate clients and processes do not
//! coordinate.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::RequestsPerSecond;

/// Outcome of checking the limiter before a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    /// The request may be dispatched now.
    Proceed,
    /// The ceiling is reached; wait this long for the next second to begin.
    Wait(Duration),
}

/// Fixed-window limiter counting requests per epoch second.
///
/// # Example
///
/// ```rust
/// use bestbuy_api::clients::{Gate, RateLimiter};
/// use bestbuy_api::RequestsPerSecond;
/// use std::time::Duration;
///
/// let mut limiter = RateLimiter::new(RequestsPerSecond::new(1).unwrap());
/// let now = Duration::from_millis(1_700_000_000_250);
///
/// assert_eq!(limiter.check(now), Gate::Proceed);
/// limiter.record(now);
/// assert_eq!(limiter.check(now), Gate::Wait(Duration::from_millis(750)));
/// ```
#[derive(Clone, Debug)]
pub struct RateLimiter {
    limit: RequestsPerSecond,
    issued_this_second: u32,
    last_request_second: Option<u64>,
}

impl RateLimiter {
    /// Creates a limiter with no requests recorded.
    #[must_use]
    pub const fn new(limit: RequestsPerSecond) -> Self {
        Self {
            limit,
            issued_this_second: 0,
            last_request_second: None,
        }
    }

    /// Returns the ceiling.
    #[must_use]
    pub const fn limit(&self) -> RequestsPerSecond {
        self.limit
    }

    /// Changes the ceiling. Requests already counted this second still count.
    pub fn set_limit(&mut self, limit: RequestsPerSecond) {
        self.limit = limit;
    }

    /// Returns how many requests were started in the last recorded second.
    #[must_use]
    pub const fn issued_this_second(&self) -> u32 {
        self.issued_this_second
    }

    /// Returns the epoch second of the last recorded request.
    #[must_use]
    pub const fn last_request_second(&self) -> Option<u64> {
        self.last_request_second
    }

    /// Decides whether a request at `now` (time since the Unix epoch) may proceed.
    #[must_use]
    pub fn check(&self, now: Duration) -> Gate {
        let at_ceiling = self.last_request_second == Some(now.as_secs())
            && self.issued_this_second >= self.limit.get();
        if at_ceiling {
            Gate::Wait(Duration::from_secs(1) - Duration::from_nanos(u64::from(now.subsec_nanos())))
        } else {
            Gate::Proceed
        }
    }

    /// Counts a request started at `now`.
    ///
    /// The count restarts whenever `now` falls in a different second than
    /// the previous request.
    pub fn record(&mut self, now: Duration) {
        let second = now.as_secs();
        if self.last_request_second != Some(second) {
            self.issued_this_second = 0;
        }
        self.last_request_second = Some(second);
        self.issued_this_second += 1;
    }

    /// Waits until a request may proceed, then counts it.
    ///
    /// Returns the total time spent waiting.
    pub async fn acquire(&mut self) -> Duration {
        let mut waited = Duration::ZERO;
        loop {
            let now = epoch_now();
            match self.check(now) {
                Gate::Proceed => {
                    self.record(now);
                    return waited;
                }
                Gate::Wait(delay) => {
                    tracing::debug!(
                        "Reached {} requests this second; waiting {:?}",
                        self.limit.get(),
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    waited += delay;
                }
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RequestsPerSecond::default())
    }
}

fn epoch_now() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(limit: u32) -> RateLimiter {
        RateLimiter::new(RequestsPerSecond::new(limit).unwrap())
    }

    fn at(secs: u64, millis: u64) -> Duration {
        Duration::from_secs(secs) + Duration::from_millis(millis)
    }

    #[test]
    fn test_proceeds_until_ceiling() {
        let mut limiter = limiter(3);
        for _ in 0..3 {
            assert_eq!(limiter.check(at(100, 10)), Gate::Proceed);
            limiter.record(at(100, 10));
        }
        assert_eq!(limiter.issued_this_second(), 3);
        assert_eq!(
            limiter.check(at(100, 400)),
            Gate::Wait(Duration::from_millis(600))
        );
    }

    #[test]
    fn test_new_second_proceeds_and_restarts_count() {
        let mut limiter = limiter(2);
        limiter.record(at(100, 0));
        limiter.record(at(100, 500));
        assert!(matches!(limiter.check(at(100, 900)), Gate::Wait(_)));

        assert_eq!(limiter.check(at(101, 0)), Gate::Proceed);
        limiter.record(at(101, 0));
        assert_eq!(limiter.issued_this_second(), 1);
        assert_eq!(limiter.last_request_second(), Some(101));
    }

    #[test]
    fn test_count_does_not_leak_across_quiet_seconds() {
        let mut limiter = limiter(2);
        limiter.record(at(100, 0));
        limiter.record(at(101, 0));
        limiter.record(at(102, 0));

        // One request in second 102 so far; a second one is allowed.
        assert_eq!(limiter.check(at(102, 10)), Gate::Proceed);
    }

    #[test]
    fn test_lowering_limit_applies_immediately() {
        let mut limiter = limiter(5);
        limiter.record(at(100, 0));
        limiter.record(at(100, 0));
        limiter.set_limit(RequestsPerSecond::new(1).unwrap());
        assert!(matches!(limiter.check(at(100, 0)), Gate::Wait(_)));
    }

    #[test]
    fn test_default_limit_is_five() {
        assert_eq!(RateLimiter::default().limit().get(), 5);
        assert_eq!(RateLimiter::default().last_request_second(), None);
    }

    #[test]
    fn test_acquire_moves_past_full_second() {
        let mut limiter = limiter(1);
        tokio_test::block_on(limiter.acquire());
        let first = limiter.last_request_second().unwrap();

        tokio_test::block_on(async {
            tokio::time::timeout(Duration::from_secs(3), limiter.acquire())
                .await
                .unwrap()
        });
        let second = limiter.last_request_second().unwrap();

        assert!(second > first);
        assert_eq!(limiter.issued_this_second(), 1);
    }
}
