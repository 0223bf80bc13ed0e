// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! API HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the API.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use taller_core::TallerError;
use taller_lifecycle::AppointmentController;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Upper bound on requests handled at once.
const MAX_CONCURRENT_REQUESTS: usize = 64;

/// Health state for unauthenticated health/metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Optional Prometheus metrics render function.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl HealthState {
    pub fn new(prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>) -> Self {
        Self {
            start_time: std::time::Instant::now(),
            prometheus_render,
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct ApiState {
    pub controller: AppointmentController,
    /// Authentication configuration for admin routes.
    pub auth: AuthConfig,
    /// Health state for unauthenticated endpoints.
    pub health: HealthState,
}

/// Server bind configuration (mirrors `[server]` from taller-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the full route table.
///
/// - GET /health, GET /metrics, POST /api/turnos (public)
/// - GET, PUT, DELETE /api/turnos (admin)
/// - POST /api/turnos/{confirmar,cancelar,recordatorio} (admin)
pub fn router(state: ApiState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics))
        .route("/api/turnos", post(handlers::create_appointment))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route(
            "/api/turnos",
            get(handlers::list_appointments)
                .put(handlers::update_appointment)
                .delete(handlers::delete_appointment),
        )
        .route("/api/turnos/confirmar", post(handlers::confirm_appointment))
        .route("/api/turnos/cancelar", post(handlers::cancel_appointment))
        .route("/api/turnos/recordatorio", post(handlers::remind_appointment))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the API server and run until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: ApiState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), TallerError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TallerError::Internal(format!("failed to bind API to {addr}: {e}")))?;

    tracing::info!("API server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| TallerError::Internal(format!("API server error: {e}")))?;

    Ok(())
}
