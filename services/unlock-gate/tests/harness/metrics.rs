// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for brute-force simulation results.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use unlock_gate::Outcome;

/// Collects metrics during an attack simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    /// Wall-clock start of the simulation
    start_time: Option<Instant>,
    /// Wall-clock end of the simulation
    end_time: Option<Instant>,
    /// Count of requests by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Count of requests by identity
    requests_per_identity: HashMap<String, usize>,
    /// Admitted attempts by identity
    admitted_per_identity: HashMap<String, usize>,
    /// Latency samples (microseconds)
    latencies: Vec<u64>,
}

impl AttackMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of an attack.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Mark the end of an attack.
    pub fn finish(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Record a request outcome.
    pub fn record(&mut self, outcome: Outcome, identity: &str, latency: Duration) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self
            .requests_per_identity
            .entry(identity.to_string())
            .or_insert(0) += 1;
        if admitted(outcome) {
            *self
                .admitted_per_identity
                .entry(identity.to_string())
                .or_insert(0) += 1;
        }
        self.latencies.push(latency.as_micros() as u64);
    }

    /// Get total request count.
    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Attempts that passed validation and the rate limiter.
    pub fn admitted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(outcome, _)| admitted(**outcome))
            .map(|(_, n)| n)
            .sum()
    }

    /// Highest number of admitted attempts for any single identity.
    pub fn max_admitted_per_identity(&self) -> usize {
        self.admitted_per_identity.values().copied().max().unwrap_or(0)
    }

    /// Get duration of the attack.
    pub fn duration(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }

    /// Get block rate (ratio of non-admitted to total).
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        (total - self.admitted()) as f64 / total as f64
    }

    /// Get median latency in microseconds.
    pub fn median_latency_us(&self) -> u64 {
        if self.latencies.is_empty() {
            return 0;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        sorted[sorted.len() / 2]
    }

    /// Get number of unique identities that made requests.
    pub fn unique_identities(&self) -> usize {
        self.requests_per_identity.len()
    }

    /// Generate a summary report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total_requests: self.total_requests(),
            admitted: self.admitted(),
            unlocked: self.count(Outcome::Allowed),
            bad_credential: self.count(Outcome::DeniedBadCredential),
            rate_limited: self.count(Outcome::DeniedRateLimited),
            invalid_input: self.count(Outcome::DeniedInvalidInput),
            actuator_failure: self.count(Outcome::ActuatorFailure),
            duration_ms: self.duration().as_millis() as u64,
            block_rate: self.block_rate(),
            median_latency_us: self.median_latency_us(),
            unique_identities: self.unique_identities(),
            max_admitted_per_identity: self.max_admitted_per_identity(),
        }
    }
}

fn admitted(outcome: Outcome) -> bool {
    matches!(
        outcome,
        Outcome::Allowed | Outcome::DeniedBadCredential | Outcome::ActuatorFailure
    )
}

/// Summary report of attack metrics.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_requests: usize,
    pub admitted: usize,
    pub unlocked: usize,
    pub bad_credential: usize,
    pub rate_limited: usize,
    pub invalid_input: usize,
    pub actuator_failure: usize,
    pub duration_ms: u64,
    pub block_rate: f64,
    pub median_latency_us: u64,
    pub unique_identities: usize,
    pub max_admitted_per_identity: usize,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Attack Metrics Report ===")?;
        writeln!(f, "Duration:          {} ms", self.duration_ms)?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f)?;
        writeln!(f, "--- Outcomes ---")?;
        writeln!(f, "Admitted:          {}", self.admitted)?;
        writeln!(f, "Unlocked:          {}", self.unlocked)?;
        writeln!(f, "Bad Credential:    {}", self.bad_credential)?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Invalid Input:     {}", self.invalid_input)?;
        writeln!(f, "Actuator Failure:  {}", self.actuator_failure)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "--- Distribution ---")?;
        writeln!(f, "Unique Identities: {}", self.unique_identities)?;
        writeln!(f, "Max Per Identity:  {}", self.max_admitted_per_identity)?;
        writeln!(f, "Median Latency:    {} us", self.median_latency_us)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = AttackMetrics::new();
        metrics.start();

        metrics.record(Outcome::DeniedBadCredential, "10.0.0.1", Duration::from_micros(100));
        metrics.record(Outcome::DeniedBadCredential, "10.0.0.2", Duration::from_micros(150));
        metrics.record(Outcome::DeniedRateLimited, "10.0.0.1", Duration::from_micros(50));
        metrics.record(Outcome::DeniedInvalidInput, "10.0.0.1", Duration::from_micros(50));

        metrics.finish();

        assert_eq!(metrics.total_requests(), 4);
        assert_eq!(metrics.admitted(), 2);
        assert_eq!(metrics.unique_identities(), 2);
        assert_eq!(metrics.max_admitted_per_identity(), 1);
        assert!((metrics.block_rate() - 0.5).abs() < 0.01);
    }
}
