// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the unlock gate.

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Unlock gate metrics, held in a registry owned by the service.
pub struct Metrics {
    registry: Registry,
    attempts: IntCounterVec,
    tracked_identities: IntGauge,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let attempts = IntCounterVec::new(
            Opts::new("unlock_attempts_total", "Unlock attempts by outcome"),
            &["outcome"],
        )?;
        let tracked_identities = IntGauge::new(
            "rate_limit_tracked_identities",
            "Caller identities currently held in the attempt log",
        )?;

        registry.register(Box::new(attempts.clone()))?;
        registry.register(Box::new(tracked_identities.clone()))?;

        Ok(Self {
            registry,
            attempts,
            tracked_identities,
        })
    }

    /// Count one attempt with the given outcome label.
    pub fn record_outcome(&self, outcome: &str) {
        self.attempts.with_label_values(&[outcome]).inc();
    }

    pub fn set_tracked_identities(&self, count: usize) {
        self.tracked_identities.set(count as i64);
    }

    pub fn outcome_count(&self, outcome: &str) -> u64 {
        self.attempts.with_label_values(&[outcome]).get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
