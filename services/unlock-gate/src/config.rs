// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the unlock gate.
//!
//! Every option is sourced from the environment (see [`Config::from_env`]).
//! Values that fail to parse fall back to their defaults; values that parse
//! are out of range (a zero-attempt limit, a zero-length window) are
//! rejected.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Configuration errors detected at start-up.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be greater than zero")]
    MustBePositive { name: &'static str },

    #[error("{name} must not exceed {max}")]
    TooLarge { name: &'static str, max: u64 },

    #[error("Passcode must not be empty")]
    EmptySecret,

    #[error("LOCK_API_URL is set but {0} is missing")]
    MissingActuatorSetting(&'static str),
}

/// Configuration for the unlock gate service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Passcode configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Door actuator configuration
    #[serde(default)]
    pub actuator: ActuatorConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Shared passcode.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The correct passcode (default: "1234")
    #[serde(default = "default_secret")]
    pub secret: String,
}

/// Sliding-window limit applied per caller identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Attempts allowed inside one window (default: 5)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Trailing window length in seconds (default: 900)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// How often idle identities are evicted, in seconds (default: 60)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Door actuator settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ActuatorConfig {
    /// Upper bound on a single unlock call in milliseconds (default: 10000)
    #[serde(default = "default_actuator_timeout_ms")]
    pub timeout_ms: u64,

    /// Simulated latency of the stub actuator in milliseconds (default: 500)
    #[serde(default = "default_stub_delay_ms")]
    pub stub_delay_ms: u64,

    /// Lock vendor endpoint; the stub actuator is used when unset
    #[serde(default)]
    pub api_url: Option<String>,

    /// Bearer token for the lock vendor API
    #[serde(default)]
    pub api_key: Option<String>,

    /// Device identifier sent with each unlock command
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

/// Longest accepted attempt window (one week).
pub const MAX_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_secret() -> String {
    "1234".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    15 * 60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_actuator_timeout_ms() -> u64 {
    10_000
}

fn default_stub_delay_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            auth: AuthConfig::default(),
            rate_limit: RateLimitConfig::default(),
            actuator: ActuatorConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_actuator_timeout_ms(),
            stub_delay_ms: default_stub_delay_ms(),
            api_url: None,
            api_key: None,
            device_id: None,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

// Secrets stay out of logs even when the whole config is debug-printed.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for ActuatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActuatorConfig")
            .field("timeout_ms", &self.timeout_ms)
            .field("stub_delay_ms", &self.stub_delay_ms)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("device_id", &self.device_id)
            .finish()
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the eviction sweep interval
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl ActuatorConfig {
    /// Get the unlock call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get the stub actuator delay
    pub fn stub_delay(&self) -> Duration {
        Duration::from_millis(self.stub_delay_ms)
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Recognised keys: `BIND_ADDR`, `DOOR_PASSWORD`, `MAX_ATTEMPTS`,
    /// `ATTEMPT_WINDOW_SECS`, `SWEEP_INTERVAL_SECS`, `ACTUATOR_TIMEOUT_MS`,
    /// `STUB_DELAY_MS`, `LOCK_API_URL`, `LOCK_API_KEY`, `LOCK_DEVICE_ID`,
    /// `METRICS_ENABLED`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(default_bind_addr),
            auth: AuthConfig {
                secret: lookup("DOOR_PASSWORD").unwrap_or_else(default_secret),
            },
            rate_limit: RateLimitConfig {
                max_attempts: parse_or(&lookup, "MAX_ATTEMPTS", default_max_attempts()),
                window_secs: parse_or(&lookup, "ATTEMPT_WINDOW_SECS", default_window_secs()),
                sweep_interval_secs: parse_or(
                    &lookup,
                    "SWEEP_INTERVAL_SECS",
                    default_sweep_interval_secs(),
                ),
            },
            actuator: ActuatorConfig {
                timeout_ms: parse_or(&lookup, "ACTUATOR_TIMEOUT_MS", default_actuator_timeout_ms()),
                stub_delay_ms: parse_or(&lookup, "STUB_DELAY_MS", default_stub_delay_ms()),
                api_url: lookup("LOCK_API_URL").filter(|v| !v.trim().is_empty()),
                api_key: lookup("LOCK_API_KEY").filter(|v| !v.trim().is_empty()),
                device_id: lookup("LOCK_DEVICE_ID").filter(|v| !v.trim().is_empty()),
            },
            metrics: MetricsConfig {
                enabled: parse_or(&lookup, "METRICS_ENABLED", default_true()),
                ..Default::default()
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.rate_limit.max_attempts == 0 {
            return Err(ConfigError::MustBePositive {
                name: "MAX_ATTEMPTS",
            });
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::MustBePositive {
                name: "ATTEMPT_WINDOW_SECS",
            });
        }
        if self.rate_limit.window_secs > MAX_WINDOW_SECS {
            return Err(ConfigError::TooLarge {
                name: "ATTEMPT_WINDOW_SECS",
                max: MAX_WINDOW_SECS,
            });
        }
        if self.rate_limit.sweep_interval_secs == 0 {
            return Err(ConfigError::MustBePositive {
                name: "SWEEP_INTERVAL_SECS",
            });
        }
        if self.actuator.timeout_ms == 0 {
            return Err(ConfigError::MustBePositive {
                name: "ACTUATOR_TIMEOUT_MS",
            });
        }
        if self.actuator.api_url.is_some() {
            if self.actuator.api_key.is_none() {
                return Err(ConfigError::MissingActuatorSetting("LOCK_API_KEY"));
            }
            if self.actuator.device_id.is_none() {
                return Err(ConfigError::MissingActuatorSetting("LOCK_DEVICE_ID"));
            }
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, "Unparseable setting, using default");
                default
            }
        },
        None => default,
    }
}
