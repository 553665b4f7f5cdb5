// src/services/rate_limiter.rs
// DOCUMENTATION: Sliding-window request throttle keyed by caller identity
// PURPOSE: Guard the search and catalog endpoints against bursty clients

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Outcome of a rate-limit check
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// When the oldest counted request leaves the window
    pub reset_at: DateTime<Utc>,
}

impl RateLimitDecision {
    /// Decision used when limiting is disabled: everything passes
    fn open() -> Self {
        RateLimitDecision {
            allowed: true,
            limit: 0,
            remaining: 0,
            reset_at: Utc::now(),
        }
    }
}

/// Sliding-window rate limiter
/// DOCUMENTATION: Counts requests inside a moving interval per key. A limit of
/// zero disables the limiter entirely - every check passes (fail-open), the
/// deliberate availability-over-strictness policy for this component.
pub struct RateLimiter {
    windows: Arc<RwLock<HashMap<String, VecDeque<Instant>>>>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    /// Create a limiter allowing `limit` requests per `window`
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            limit,
            window,
        }
    }

    /// Convenience constructor for the per-minute configuration value
    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    /// Whether limiting is active at all
    pub fn enabled(&self) -> bool {
        self.limit > 0
    }

    /// Check and record a request for the given caller key
    /// DOCUMENTATION: Prunes timestamps older than the window, then admits the
    /// request if the remaining count is below the limit. Admitted requests
    /// are recorded; rejected ones are not (they do not extend the window).
    pub async fn check(&self, key: &str) -> RateLimitDecision {
        if !self.enabled() {
            return RateLimitDecision::open();
        }

        let now = Instant::now();
        let mut windows = self.windows.write().await;
        let timestamps = windows.entry(key.to_string()).or_default();

        // Slide the window
        while let Some(oldest) = timestamps.front() {
            if now.duration_since(*oldest) >= self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        let used = timestamps.len() as u32;
        let allowed = used < self.limit;

        if allowed {
            timestamps.push_back(now);
        } else {
            log::debug!("Rate limit exceeded for key: {}", key);
        }

        let used_after = timestamps.len() as u32;
        let reset_at = timestamps
            .front()
            .map(|oldest| {
                let until_reset = self.window.saturating_sub(now.duration_since(*oldest));
                Utc::now()
                    + ChronoDuration::from_std(until_reset)
                        .unwrap_or_else(|_| ChronoDuration::zero())
            })
            .unwrap_or_else(Utc::now);

        RateLimitDecision {
            allowed,
            limit: self.limit,
            remaining: self.limit.saturating_sub(used_after),
            reset_at,
        }
    }

    /// Drop keys whose every timestamp has left the window
    /// DOCUMENTATION: `check` prunes inside a key's deque but only touches the
    /// keys that come back; idle callers would otherwise accumulate forever.
    /// Driven periodically by start_cleanup_task.
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut windows = self.windows.write().await;
        let before_count = windows.len();

        windows.retain(|_, timestamps| {
            while let Some(oldest) = timestamps.front() {
                if now.duration_since(*oldest) >= self.window {
                    timestamps.pop_front();
                } else {
                    break;
                }
            }
            !timestamps.is_empty()
        });

        let after_count = windows.len();
        if before_count > after_count {
            log::info!(
                "Rate limiter cleanup: removed {} idle callers ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    /// Number of caller keys currently tracked
    pub async fn tracked_keys(&self) -> usize {
        self.windows.read().await.len()
    }

    /// Drop all recorded windows
    /// DOCUMENTATION: Teardown hook for test isolation; the limiter itself is
    /// a process-wide singleton and is never reconstructed per request
    #[allow(dead_code)]
    pub async fn reset(&self) {
        self.windows.write().await.clear();
    }
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically evicts idle caller keys
pub fn start_cleanup_task(limiter: Arc<RateLimiter>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            limiter.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_under_limit() {
        let limiter = RateLimiter::per_minute(3);

        for expected_remaining in [2, 1, 0] {
            let decision = limiter.check("10.0.0.1").await;
            assert!(decision.allowed);
            assert_eq!(decision.limit, 3);
            assert_eq!(decision.remaining, expected_remaining);
        }
    }

    #[tokio::test]
    async fn test_blocks_over_limit() {
        let limiter = RateLimiter::per_minute(2);

        assert!(limiter.check("10.0.0.1").await.allowed);
        assert!(limiter.check("10.0.0.1").await.allowed);

        let decision = limiter.check("10.0.0.1").await;
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = RateLimiter::per_minute(1);

        assert!(limiter.check("10.0.0.1").await.allowed);
        assert!(!limiter.check("10.0.0.1").await.allowed);
        assert!(limiter.check("10.0.0.2").await.allowed);
    }

    #[tokio::test]
    async fn test_disabled_limiter_fails_open() {
        let limiter = RateLimiter::per_minute(0);
        assert!(!limiter.enabled());

        // Any key, any volume
        for i in 0..100 {
            let decision = limiter.check(&format!("caller-{}", i % 3)).await;
            assert!(decision.allowed);
        }
    }

    #[tokio::test]
    async fn test_window_slides() {
        let limiter = RateLimiter::new(1, Duration::from_millis(100));

        assert!(limiter.check("10.0.0.1").await.allowed);
        assert!(!limiter.check("10.0.0.1").await.allowed);

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(limiter.check("10.0.0.1").await.allowed);
    }

    #[tokio::test]
    async fn test_cleanup_evicts_idle_keys() {
        let limiter = RateLimiter::new(5, Duration::from_millis(10));

        for i in 0..1000 {
            limiter.check(&format!("caller-{}", i)).await;
        }
        assert_eq!(limiter.tracked_keys().await, 1000);

        tokio::time::sleep(Duration::from_millis(20)).await;
        limiter.cleanup().await;

        assert_eq!(limiter.tracked_keys().await, 0);
    }

    #[tokio::test]
    async fn test_cleanup_keeps_active_keys() {
        let limiter = RateLimiter::new(5, Duration::from_millis(100));

        limiter.check("idle").await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        limiter.check("active").await;

        limiter.cleanup().await;

        assert_eq!(limiter.tracked_keys().await, 1);
        // The surviving key still has its request counted
        let decision = limiter.check("active").await;
        assert_eq!(decision.remaining, 3);
    }

    #[tokio::test]
    async fn test_reset_clears_state() {
        let limiter = RateLimiter::per_minute(1);

        assert!(limiter.check("10.0.0.1").await.allowed);
        assert!(!limiter.check("10.0.0.1").await.allowed);

        limiter.reset().await;

        assert!(limiter.check("10.0.0.1").await.allowed);
    }
}
