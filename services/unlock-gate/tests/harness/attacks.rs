// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Guessing campaign patterns for security testing.

use std::time::Duration;

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submissions
    pub total_requests: usize,
    /// Simulated time between consecutive submissions
    pub interval: Duration,
    /// Number of caller identities the attacker rotates through
    pub unique_identities: usize,
    /// Submit malformed bodies instead of guesses
    pub malformed: bool,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            interval: Duration::from_secs(1),
            unique_identities: 1,
            malformed: false,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// One caller hammering the keypad.
    pub fn single_identity_brute_force() -> Self {
        Self {
            total_requests: 500,
            interval: Duration::from_millis(100),
            ..Default::default()
        }
    }

    /// Guesses spread across many callers.
    pub fn distributed_brute_force() -> Self {
        Self {
            total_requests: 1000,
            interval: Duration::from_millis(10),
            unique_identities: 100,
            ..Default::default()
        }
    }

    /// One guess every three minutes, exactly the sustainable rate at the
    /// default 5 per 15 minutes.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 40,
            interval: Duration::from_secs(180),
            ..Default::default()
        }
    }

    /// Just faster than the sustainable rate.
    pub fn fast_drip() -> Self {
        Self {
            total_requests: 40,
            interval: Duration::from_secs(120),
            ..Default::default()
        }
    }

    /// Garbage bodies from a single caller.
    pub fn malformed_flood() -> Self {
        Self {
            total_requests: 200,
            interval: Duration::from_millis(10),
            malformed: true,
            ..Default::default()
        }
    }

    /// Simulated span covered by the campaign.
    pub fn simulated_duration(&self) -> Duration {
        self.interval * self.total_requests as u32
    }

    /// Upper bound on admitted attempts for a sliding window limiter.
    ///
    /// Each identity gets `max_attempts` per window, and a fresh allowance
    /// for every further window the campaign spans.
    pub fn max_admitted(&self, max_attempts: u32, window: Duration) -> usize {
        let windows = self.simulated_duration().as_secs_f64() / window.as_secs_f64();
        let windows = windows.floor() as usize + 1;
        self.unique_identities * max_attempts as usize * windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_admitted_single_window() {
        let config = AttackConfig::single_identity_brute_force();
        assert_eq!(config.max_admitted(5, Duration::from_secs(900)), 5);
    }

    #[test]
    fn test_max_admitted_spanning_windows() {
        let config = AttackConfig::fast_drip();
        // 40 * 120s = 80 min => 6 windows of 15 min
        assert_eq!(config.max_admitted(5, Duration::from_secs(900)), 30);
    }
}
