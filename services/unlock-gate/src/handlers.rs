// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the unlock gate.
//!
//! `/unlock` accepts `POST {"password": "..."}` and answers with
//! `{success, message}`. Every authorization outcome maps to one fixed
//! status code; anything unexpected becomes a generic 500.

use crate::actuator::Actuator;
use crate::auth::{AuthorizationResult, AuthorizationService, Outcome};
use crate::config::Config;
use crate::error::{internal_error_response, Result, UnlockResponse};
use crate::identity::client_identity;
use crate::metrics::Metrics;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, error};

pub const MSG_METHOD_NOT_ALLOWED: &str = "Método não permitido";

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Shared application state.
pub struct AppState {
    pub service: AuthorizationService,
    pub metrics: Metrics,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, actuator: Arc<dyn Actuator>) -> Result<Self> {
        Ok(Self {
            service: AuthorizationService::from_config(&config, actuator),
            metrics: Metrics::new()?,
            config,
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router with CORS, panic recovery and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/unlock", any(unlock));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "unlock-gate",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Unlock endpoint.
pub async fn unlock(State(state): State<Arc<AppState>>, request: Request<Body>) -> Result<Response> {
    // Normally answered by the CORS layer before reaching here.
    if *request.method() == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }
    if *request.method() != Method::POST {
        debug!(method = %request.method(), "Rejected unlock method");
        return Ok((
            StatusCode::METHOD_NOT_ALLOWED,
            Json(UnlockResponse::failure(MSG_METHOD_NOT_ALLOWED)),
        )
            .into_response());
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let identity = client_identity(request.headers(), peer);

    // Oversized or broken bodies are malformed input, not server faults.
    let result = match axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES).await {
        Ok(body) => state.service.authorize(&body, &identity, Instant::now()).await,
        Err(err) => state
            .service
            .reject_invalid(&identity, &format!("unreadable body: {}", err)),
    };
    state.metrics.record_outcome(result.outcome.as_str());

    Ok(result_response(&result))
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<Response> {
    state
        .metrics
        .set_tracked_identities(state.service.limiter().tracked_identities());
    let text = state.metrics.render()?;

    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4"),
        )],
        text,
    )
        .into_response())
}

/// Map an authorization result onto its HTTP response.
pub fn result_response(result: &AuthorizationResult) -> Response {
    let body = Json(UnlockResponse {
        success: result.is_allowed(),
        message: result.detail.clone(),
    });

    match result.outcome {
        Outcome::Allowed => (StatusCode::OK, body).into_response(),
        Outcome::DeniedInvalidInput => (StatusCode::BAD_REQUEST, body).into_response(),
        Outcome::DeniedBadCredential => (StatusCode::UNAUTHORIZED, body).into_response(),
        Outcome::ActuatorFailure => (StatusCode::INTERNAL_SERVER_ERROR, body).into_response(),
        Outcome::DeniedRateLimited => {
            let retry_secs = result
                .retry_after
                .map(|d| d.as_millis().div_ceil(1000) as u64)
                .unwrap_or(0);
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_secs.to_string())],
                body,
            )
                .into_response()
        }
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "Handler panicked");
    internal_error_response()
}
