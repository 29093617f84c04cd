// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Request-boundary errors.
//!
//! Anything that goes wrong outside the authorization pipeline is logged
//! with its detail and answered with the same generic 500 body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub const MSG_INTERNAL: &str = "Erro interno do servidor";

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Body shared by every unlock endpoint response.
#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub success: bool,
    pub message: String,
}

impl UnlockResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Generic 500 response with no detail.
pub fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(UnlockResponse::failure(MSG_INTERNAL)),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");
        internal_error_response()
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
