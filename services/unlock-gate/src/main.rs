// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Unlock Gate Service
//!
//! Serves the `/unlock` endpoint used by the lock-screen UI. A correct
//! passcode triggers the door actuator; every attempt counts against a
//! per-caller sliding window.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `DOOR_PASSWORD`: The passcode (default: 1234)
//! - `MAX_ATTEMPTS`: Attempts per caller per window (default: 5)
//! - `ATTEMPT_WINDOW_SECS`: Window length in seconds (default: 900)
//! - `SWEEP_INTERVAL_SECS`: Idle identity eviction period (default: 60)
//! - `ACTUATOR_TIMEOUT_MS`: Unlock call timeout (default: 10000)
//! - `STUB_DELAY_MS`: Stub actuator latency (default: 500)
//! - `LOCK_API_URL`, `LOCK_API_KEY`, `LOCK_DEVICE_ID`: Lock vendor API;
//!   the stub actuator is used when unset
//! - `METRICS_ENABLED`: Expose `/metrics` (default: true)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use unlock_gate::{
    actuator,
    config::Config,
    handlers::{router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let actuator = actuator::from_config(&config.actuator);
    info!(
        bind_addr = %config.bind_addr,
        max_attempts = config.rate_limit.max_attempts,
        window_secs = config.rate_limit.window_secs,
        actuator = actuator.name(),
        actuator_timeout_ms = config.actuator.timeout_ms,
        "Starting unlock gate"
    );

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), actuator)?);

    // Spawn eviction task
    let sweep_state = state.clone();
    let sweep_interval = config.rate_limit.sweep_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            let limiter = sweep_state.service.limiter();
            limiter.sweep(Instant::now());
            sweep_state
                .metrics
                .set_tracked_identities(limiter.tracked_identities());
        }
    });

    // Build router
    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
