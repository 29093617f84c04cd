// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Caller identity for rate limiting.
//!
//! Priority: first entry of `X-Forwarded-For`, then `X-Real-IP`, then the
//! peer socket address, then the literal `"unknown"`.
//!
//! A blank first `X-Forwarded-For` entry (`", 10.0.0.1"`) does not become
//! the identity; the lookup moves on to `X-Real-IP` and the peer address.
//! All callers sending such a header would otherwise share one empty key.

use axum::http::HeaderMap;
use std::net::SocketAddr;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Derive the rate limit key for a request.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    forwarded_for(headers)
        .or_else(|| header_value(headers, X_REAL_IP))
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_IDENTITY.to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(X_FORWARDED_FOR)?.to_str().ok()?;
    let first = raw.split(',').next()?.trim();
    (!first.is_empty()).then(|| first.to_string())
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?.to_str().ok()?.trim();
    (!value.is_empty()).then(|| value.to_string())
}
