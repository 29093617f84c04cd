// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Door actuator.
//!
//! The actuator performs the physical unlock. The gate only sees whether it
//! succeeded: `Ok(true)` means the door opened, `Ok(false)` or any error
//! means it did not.

use crate::config::ActuatorConfig;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Boxed future returned by [`Actuator::unlock`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Actuator failures.
#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("Unlock command timed out after {0:?}")]
    Timeout(Duration),

    #[error("Lock API rejected the command with status {status}")]
    Rejected { status: u16 },

    #[error("Lock API transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Actuator refused: {0}")]
    Refused(String),
}

/// Something that can open the door.
pub trait Actuator: Send + Sync {
    /// Send one unlock command.
    fn unlock(&self) -> BoxFuture<'_, Result<bool, ActuatorError>>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Placeholder actuator used until a lock is wired up.
///
/// Waits for `delay` and then reports `outcome`.
#[derive(Debug, Clone)]
pub struct StubActuator {
    delay: Duration,
    outcome: bool,
}

impl StubActuator {
    /// Stub that always succeeds after `delay`.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            outcome: true,
        }
    }

    /// Stub that reports `outcome` after `delay`.
    pub fn with_outcome(delay: Duration, outcome: bool) -> Self {
        Self { delay, outcome }
    }
}

impl Actuator for StubActuator {
    fn unlock(&self) -> BoxFuture<'_, Result<bool, ActuatorError>> {
        Box::pin(async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            info!(outcome = self.outcome, "Unlock command sent (stub)");
            Ok(self.outcome)
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnlockCommand<'a> {
    device_id: &'a str,
    action: &'static str,
}

/// Actuator backed by the lock vendor's HTTP API.
pub struct HttpActuator {
    url: String,
    api_key: String,
    device_id: String,
    client: reqwest::Client,
}

impl HttpActuator {
    pub fn new(url: String, api_key: String, device_id: String) -> Self {
        Self {
            url,
            api_key,
            device_id,
            client: reqwest::Client::new(),
        }
    }
}

impl Actuator for HttpActuator {
    fn unlock(&self) -> BoxFuture<'_, Result<bool, ActuatorError>> {
        Box::pin(async move {
            debug!(url = %self.url, device_id = %self.device_id, "Sending unlock command");

            let response = self
                .client
                .post(&self.url)
                .bearer_auth(&self.api_key)
                .json(&UnlockCommand {
                    device_id: &self.device_id,
                    action: "unlock",
                })
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                info!(device_id = %self.device_id, "Unlock command accepted");
                Ok(true)
            } else {
                warn!(device_id = %self.device_id, status = status.as_u16(), "Unlock command rejected");
                Err(ActuatorError::Rejected {
                    status: status.as_u16(),
                })
            }
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Build the actuator selected by configuration.
///
/// The HTTP actuator is used when a lock API URL is configured; otherwise
/// the stub stands in.
pub fn from_config(config: &ActuatorConfig) -> Arc<dyn Actuator> {
    match (&config.api_url, &config.api_key, &config.device_id) {
        (Some(url), Some(key), Some(device)) => {
            Arc::new(HttpActuator::new(url.clone(), key.clone(), device.clone()))
        }
        _ => Arc::new(StubActuator::new(config.stub_delay())),
    }
}
