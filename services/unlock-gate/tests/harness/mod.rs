// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for passcode brute-force simulation.
//!
//! This module provides utilities for replaying guessing campaigns against
//! the authorization service on a simulated clock.

pub mod attacks;
pub mod generators;
pub mod metrics;
