use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use log::debug;

/// Default admissions per client inside one window
pub const DEFAULT_MAX_REQUESTS: usize = 16;

/// Default window length (14 days)
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Client id used when the peer address is unknown
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Rejected,
}

/// Sliding-window request counter keyed by client id.
///
/// Each client keeps the instants of its admitted requests. A check prunes instants
/// older than the window, then admits and records `now` only while fewer than
/// `max_requests` remain. Entries are never evicted beyond that pruning.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    entries: DashMap<String, VecDeque<Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            entries: DashMap::new(),
        }
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn check(&self, client: &str) -> Admission {
        self.check_at(client, Instant::now())
    }

    /// Check and record a request at an explicit instant.
    ///
    /// The entry guard is held across prune, count and append, so concurrent checks
    /// for one client serialize and never over-admit.
    pub fn check_at(&self, client: &str, now: Instant) -> Admission {
        let mut timestamps = self.entries.entry(client.to_string()).or_default();

        if let Some(window_start) = now.checked_sub(self.window) {
            while timestamps.front().is_some_and(|t| *t < window_start) {
                timestamps.pop_front();
            }
        }

        if timestamps.len() >= self.max_requests {
            debug!("Rate limit hit for {client}: {} requests in window", timestamps.len());
            return Admission::Rejected;
        }

        timestamps.push_back(now);
        Admission::Allowed
    }

    /// Number of requests currently recorded for a client
    pub fn recorded(&self, client: &str) -> usize {
        self.entries.get(client).map(|t| t.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_rejects_after_max_requests() {
        let limiter = RateLimiter::default();
        let start = Instant::now();
        for i in 0..16 {
            let now = start + Duration::from_secs(i);
            assert_eq!(limiter.check_at("10.0.0.1", now), Admission::Allowed, "request {i}");
        }
        assert_eq!(
            limiter.check_at("10.0.0.1", start + Duration::from_secs(60)),
            Admission::Rejected
        );
        assert_eq!(limiter.recorded("10.0.0.1"), 16);
    }

    #[test]
    fn test_admits_again_after_window_elapses() {
        let limiter = RateLimiter::default();
        let start = Instant::now();
        for _ in 0..16 {
            limiter.check_at("10.0.0.1", start);
        }
        assert_eq!(limiter.check_at("10.0.0.1", start), Admission::Rejected);

        let later = start + DEFAULT_WINDOW + Duration::from_secs(1);
        assert_eq!(limiter.check_at("10.0.0.1", later), Admission::Allowed);
        assert_eq!(limiter.recorded("10.0.0.1"), 1);
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let start = Instant::now();
        assert_eq!(limiter.check_at("a", start), Admission::Allowed);
        assert_eq!(
            limiter.check_at("a", start + Duration::from_secs(10)),
            Admission::Rejected
        );
        assert_eq!(
            limiter.check_at("a", start + Duration::from_secs(11)),
            Admission::Allowed
        );
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert_eq!(limiter.check_at("a", now), Admission::Allowed);
        assert_eq!(limiter.check_at("a", now), Admission::Rejected);
        assert_eq!(limiter.check_at("b", now), Admission::Allowed);
        assert_eq!(limiter.check_at(UNKNOWN_CLIENT, now), Admission::Allowed);
    }

    #[test]
    fn test_rejected_requests_are_not_recorded() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();
        for _ in 0..10 {
            limiter.check_at("a", now);
        }
        assert_eq!(limiter.recorded("a"), 2);
    }

    #[test]
    fn test_concurrent_checks_admit_exactly_max() {
        let limiter = Arc::new(RateLimiter::default());
        let admitted = Arc::new(AtomicUsize::new(0));

        std::thread::scope(|s| {
            for _ in 0..8 {
                let limiter = Arc::clone(&limiter);
                let admitted = Arc::clone(&admitted);
                s.spawn(move || {
                    for _ in 0..10 {
                        if limiter.check("shared") == Admission::Allowed {
                            admitted.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                });
            }
        });

        assert_eq!(admitted.load(Ordering::SeqCst), DEFAULT_MAX_REQUESTS);
    }
}
