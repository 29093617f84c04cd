// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for brute-force simulation.

use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of caller identities (10.x.x.x addresses).
pub fn generate_identities(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c)).to_string()
        })
        .collect()
}

/// Generate sequential four-digit guesses, skipping `secret`.
pub fn generate_guesses(count: usize, secret: &str) -> Vec<String> {
    (0..10_000u32)
        .map(|n| format!("{:04}", n))
        .filter(|guess| guess != secret)
        .take(count)
        .collect()
}

/// JSON body for a passcode submission.
pub fn unlock_body(passcode: &str) -> Vec<u8> {
    serde_json::json!({ "password": passcode })
        .to_string()
        .into_bytes()
}

/// Bodies that must be rejected before rate limiting.
pub fn generate_malformed_bodies() -> Vec<&'static [u8]> {
    vec![
        &b""[..],
        b"   ",
        b"{}",
        b"null",
        b"[]",
        b"\"1234\"",
        b"password=1234",
        b"{\"password\":null}",
        b"{\"password\":1234}",
        b"{\"password\":true}",
        b"{\"password\":[\"1\",\"2\",\"3\",\"4\"]}",
        b"{\"password\":{\"$ne\":\"\"}}",
        b"{\"password\":\"\"}",
        b"{\"pass\":\"1234\"}",
        b"{\"password\":\"1234\"",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_identities() {
        let ids = generate_identities(256);
        assert_eq!(ids.len(), 256);
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 256);
        assert_eq!(ids[1], "10.0.0.1");
    }

    #[test]
    fn test_guesses_skip_secret() {
        let guesses = generate_guesses(2000, "1234");
        assert_eq!(guesses.len(), 2000);
        assert!(!guesses.iter().any(|g| g == "1234"));
        assert_eq!(guesses[0], "0000");
    }
}
