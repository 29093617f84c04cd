// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Unlock request validator.
//!
//! Extracts the submitted passcode from a raw request body. A body is
//! acceptable only if it is a JSON object whose `password` member is a
//! non-empty string; anything else is rejected before the caller is
//! charged a rate limit slot.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Request body is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} must be a string, got {actual}")]
    WrongType {
        field: &'static str,
        actual: &'static str,
    },

    #[error("Field {0} must not be empty")]
    Empty(&'static str),
}

/// A passcode that passed validation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(passcode: impl Into<String>) -> Self {
        Self(passcode.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Extract the passcode from a JSON request body.
pub fn extract_credential(body: &[u8]) -> Result<Credential, ValidationError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "Unparseable unlock body");
        ValidationError::MalformedBody(e.to_string())
    })?;

    credential_from_value(&value)
}

/// Extract the passcode from an already-parsed JSON document.
pub fn credential_from_value(value: &Value) -> Result<Credential, ValidationError> {
    match value.get("password") {
        None | Some(Value::Null) => Err(ValidationError::MissingField("password")),
        Some(Value::String(s)) if s.is_empty() => Err(ValidationError::Empty("password")),
        Some(Value::String(s)) => Ok(Credential(s.clone())),
        Some(other) => Err(ValidationError::WrongType {
            field: "password",
            actual: json_type_name(other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
