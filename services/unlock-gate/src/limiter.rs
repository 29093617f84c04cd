// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window attempt limiter.
//!
//! Every unlock attempt from a caller identity is recorded with its
//! timestamp. An identity may make at most `max_attempts` attempts inside
//! any trailing `window`; the attempt that would exceed the limit is
//! rejected without being recorded.
//!
//! The attempt log is owned by the limiter instance. Each identity's
//! read-filter-append sequence runs under its map entry lock, so two
//! concurrent requests from the same caller can never both take the last
//! slot, while different callers only contend at shard granularity.

use crate::config::RateLimitConfig;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

const MILLIS_PER_MINUTE: u128 = 60_000;

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Attempt admitted and recorded
    Allowed,
    /// Attempt rejected; not recorded
    Limited {
        /// Time until the oldest counted attempt leaves the window
        retry_after: Duration,
    },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            RateLimitDecision::Allowed => None,
            RateLimitDecision::Limited { retry_after } => Some(*retry_after),
        }
    }

    /// Retry delay rounded up to whole minutes, for display.
    pub fn retry_after_minutes(&self) -> Option<u64> {
        self.retry_after().map(ceil_minutes)
    }
}

/// Round a duration up to whole minutes.
pub fn ceil_minutes(duration: Duration) -> u64 {
    duration.as_millis().div_ceil(MILLIS_PER_MINUTE) as u64
}

/// Per-identity sliding-window limiter.
pub struct RateLimiter {
    max_attempts: usize,
    window: Duration,
    attempts: DashMap<String, Vec<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_limits(config.max_attempts, config.window_duration())
    }

    /// Create a limiter from raw limits.
    pub fn with_limits(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts: max_attempts as usize,
            window,
            attempts: DashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts as u32
    }

    /// Check and record one attempt for `identity` at `now`.
    pub fn check(&self, identity: &str, now: Instant) -> RateLimitDecision {
        let window = self.window;
        let mut entry = self.attempts.entry(identity.to_string()).or_default();
        let log = entry.value_mut();

        // Expired timestamps are dropped on every write.
        log.retain(|t| now.saturating_duration_since(*t) < window);

        if log.len() >= self.max_attempts {
            let retry_after = log
                .first()
                .map(|oldest| window.saturating_sub(now.saturating_duration_since(*oldest)))
                .unwrap_or(window);
            debug!(identity, attempts = log.len(), ?retry_after, "Attempt limit reached");
            return RateLimitDecision::Limited { retry_after };
        }

        log.push(now);
        debug!(
            identity,
            attempts = log.len(),
            max_attempts = self.max_attempts,
            "Attempt recorded"
        );
        RateLimitDecision::Allowed
    }

    /// Count attempts by `identity` still inside the window at `now`.
    pub fn recent_attempts(&self, identity: &str, now: Instant) -> usize {
        self.attempts
            .get(identity)
            .map(|log| {
                log.iter()
                    .filter(|t| now.saturating_duration_since(**t) < self.window)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Evict identities with no attempt inside the window.
    ///
    /// Returns the number of identities removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let window = self.window;
        let before = self.attempts.len();
        self.attempts.retain(|_, log| {
            log.retain(|t| now.saturating_duration_since(*t) < window);
            !log.is_empty()
        });
        let evicted = before.saturating_sub(self.attempts.len());
        if evicted > 0 {
            debug!(evicted, remaining = self.attempts.len(), "Evicted idle identities");
        }
        evicted
    }

    /// Number of identities currently held in the attempt log.
    pub fn tracked_identities(&self) -> usize {
        self.attempts.len()
    }
}
