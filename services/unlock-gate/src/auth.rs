// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Unlock authorization pipeline.
//!
//! Each request passes through the same ordered checks:
//!
//! 1. Input validation (no rate limit slot is consumed on failure)
//! 2. Rate limit check for the caller identity (records the attempt)
//! 3. Passcode comparison in constant time
//! 4. Actuator invocation, bounded by a timeout
//!
//! The first failing step decides the outcome. Every outcome is written to
//! the `audit` log target with the caller identity and a UTC timestamp.

use crate::actuator::{Actuator, ActuatorError};
use crate::config::Config;
use crate::limiter::{ceil_minutes, RateLimitDecision, RateLimiter};
use crate::validator::{extract_credential, Credential};
use std::sync::Arc;
use std::time::{Duration, Instant};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

pub const MSG_ALLOWED: &str = "Porta desbloqueada com sucesso!";
pub const MSG_INVALID_INPUT: &str = "Senha inválida";
pub const MSG_BAD_CREDENTIAL: &str = "Senha incorreta";
pub const MSG_ACTUATOR_FAILURE: &str = "Erro ao desbloquear a porta. Tente novamente.";

/// Terminal state of one authorization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Allowed,
    DeniedRateLimited,
    DeniedBadCredential,
    DeniedInvalidInput,
    ActuatorFailure,
}

impl Outcome {
    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::DeniedRateLimited => "denied_rate_limited",
            Self::DeniedBadCredential => "denied_bad_credential",
            Self::DeniedInvalidInput => "denied_invalid_input",
            Self::ActuatorFailure => "actuator_failure",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResult {
    pub outcome: Outcome,
    /// User-facing message
    pub detail: String,
    /// Present only when rate limited
    pub retry_after: Option<Duration>,
}

impl AuthorizationResult {
    fn new(outcome: Outcome, detail: &str) -> Self {
        Self {
            outcome,
            detail: detail.to_string(),
            retry_after: None,
        }
    }

    fn rate_limited(retry_after: Duration) -> Self {
        Self {
            outcome: Outcome::DeniedRateLimited,
            detail: format!(
                "Muitas tentativas. Tente novamente em {} minutos.",
                ceil_minutes(retry_after)
            ),
            retry_after: Some(retry_after),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.outcome == Outcome::Allowed
    }

    /// Retry delay rounded up to whole minutes.
    pub fn retry_after_minutes(&self) -> Option<u64> {
        self.retry_after.map(ceil_minutes)
    }
}

/// Decides whether a submitted passcode opens the door.
pub struct AuthorizationService {
    secret: Credential,
    limiter: RateLimiter,
    actuator: Arc<dyn Actuator>,
    actuator_timeout: Duration,
}

impl AuthorizationService {
    pub fn new(
        secret: Credential,
        limiter: RateLimiter,
        actuator: Arc<dyn Actuator>,
        actuator_timeout: Duration,
    ) -> Self {
        Self {
            secret,
            limiter,
            actuator,
            actuator_timeout,
        }
    }

    /// Build the service from configuration and an actuator.
    pub fn from_config(config: &Config, actuator: Arc<dyn Actuator>) -> Self {
        Self::new(
            Credential::new(config.auth.secret.clone()),
            RateLimiter::new(&config.rate_limit),
            actuator,
            config.actuator.timeout(),
        )
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Authorize an unlock request from its raw JSON body.
    pub async fn authorize(&self, body: &[u8], identity: &str, now: Instant) -> AuthorizationResult {
        let credential = match extract_credential(body) {
            Ok(credential) => credential,
            Err(err) => return self.reject_invalid(identity, &err.to_string()),
        };

        self.authorize_credential(&credential, identity, now).await
    }

    /// Deny a request whose body never yielded a credential.
    ///
    /// Audited as invalid input; no rate limit slot is consumed.
    pub fn reject_invalid(&self, identity: &str, reason: &str) -> AuthorizationResult {
        let result = AuthorizationResult::new(Outcome::DeniedInvalidInput, MSG_INVALID_INPUT);
        audit(identity, &result, Some(reason));
        result
    }

    /// Authorize an already-validated passcode.
    pub async fn authorize_credential(
        &self,
        credential: &Credential,
        identity: &str,
        now: Instant,
    ) -> AuthorizationResult {
        if let RateLimitDecision::Limited { retry_after } = self.limiter.check(identity, now) {
            let result = AuthorizationResult::rate_limited(retry_after);
            audit(identity, &result, None);
            return result;
        }

        if !self.matches_secret(credential) {
            let result = AuthorizationResult::new(Outcome::DeniedBadCredential, MSG_BAD_CREDENTIAL);
            audit(identity, &result, None);
            return result;
        }

        match self.actuate().await {
            Ok(()) => {
                let result = AuthorizationResult::new(Outcome::Allowed, MSG_ALLOWED);
                audit(identity, &result, None);
                result
            }
            Err(err) => {
                let result =
                    AuthorizationResult::new(Outcome::ActuatorFailure, MSG_ACTUATOR_FAILURE);
                audit(identity, &result, Some(&err.to_string()));
                result
            }
        }
    }

    fn matches_secret(&self, credential: &Credential) -> bool {
        bool::from(self.secret.as_bytes().ct_eq(credential.as_bytes()))
    }

    async fn actuate(&self) -> Result<(), ActuatorError> {
        match tokio::time::timeout(self.actuator_timeout, self.actuator.unlock()).await {
            Ok(Ok(true)) => Ok(()),
            Ok(Ok(false)) => Err(ActuatorError::Refused(format!(
                "{} actuator reported failure",
                self.actuator.name()
            ))),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(ActuatorError::Timeout(self.actuator_timeout)),
        }
    }
}

/// Write one audit record for a finished request.
fn audit(identity: &str, result: &AuthorizationResult, reason: Option<&str>) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let outcome = result.outcome.as_str();
    let retry_after_secs = result.retry_after.map(|d| d.as_secs());

    match result.outcome {
        Outcome::Allowed => info!(
            target: "audit",
            identity,
            outcome,
            %timestamp,
            "Access granted"
        ),
        _ => warn!(
            target: "audit",
            identity,
            outcome,
            %timestamp,
            retry_after_secs,
            reason,
            "Access denied"
        ),
    }
}
