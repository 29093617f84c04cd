// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Unlock Gate
//!
//! This crate provides the passcode check behind a lock-screen door
//! opener:
//!
//! - Per-caller sliding-window rate limiting (5 attempts / 15 min default)
//! - Passcode validation and constant-time comparison
//! - Door actuator invocation with a bounded timeout
//! - Audit logging of every decision

pub mod actuator;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod limiter;
pub mod metrics;
pub mod validator;

pub use auth::{AuthorizationResult, AuthorizationService, Outcome};
pub use config::Config;
pub use limiter::{RateLimitDecision, RateLimiter};
pub use validator::{Credential, ValidationError};
