// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the appointment API.
//!
//! Handles `/health`, `/metrics` and the `/api/turnos` routes.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use taller_core::types::parse_date;
use taller_core::{Appointment, AppointmentId, AppointmentPatch, HealthStatus, NewAppointment};
use taller_lifecycle::LifecycleOutcome;

use crate::error::ApiError;
use crate::server::ApiState;

/// Query string accepted by `/api/turnos` routes.
#[derive(Debug, Default, Deserialize)]
pub struct TurnoQuery {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub fecha: Option<String>,
}

impl TurnoQuery {
    fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }

    /// The requested id. A non-numeric id matches no appointment.
    fn id(&self) -> Result<AppointmentId, ApiError> {
        let raw = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ApiError::MissingId)?;
        raw.parse::<i64>()
            .map(AppointmentId)
            .map_err(|_| ApiError::NotFound)
    }
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every adapter is healthy, `degraded` otherwise.
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub store: String,
    pub notifier: String,
    pub channel: String,
}

/// Response body for DELETE /api/turnos.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /health
pub async fn get_health(State(state): State<ApiState>) -> Response {
    let controller = &state.controller;
    let store = controller
        .store()
        .health_check()
        .await
        .unwrap_or_else(|e| HealthStatus::Unhealthy(e.to_string()));
    let notifier = controller
        .notifier()
        .health_check()
        .await
        .unwrap_or_else(|e| HealthStatus::Unhealthy(e.to_string()));

    let all_healthy = [&store, &notifier]
        .iter()
        .all(|h| matches!(h, HealthStatus::Healthy));
    let body = HealthResponse {
        status: if all_healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        store: store.label().to_string(),
        notifier: notifier.label().to_string(),
        channel: controller.notifier().channel().to_string(),
    };

    let status = if matches!(store, HealthStatus::Unhealthy(_)) {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (status, Json(body)).into_response()
}

/// GET /metrics
///
/// Prometheus text format, or 404 when no recorder is installed.
pub async fn get_metrics(State(state): State<ApiState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            [("content-type", "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// POST /api/turnos
///
/// The booking form. The confirmation delivery result is logged by the
/// controller and not returned.
pub async fn create_appointment(
    State(state): State<ApiState>,
    body: Result<Json<NewAppointment>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let Json(request) = body.map_err(|e| {
        tracing::debug!(error = %e, "booking body rejected");
        ApiError::MissingFields
    })?;
    let outcome = state.controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(outcome.appointment)))
}

/// GET /api/turnos[?id=N | ?fecha=YYYY-MM-DD]
pub async fn list_appointments(
    State(state): State<ApiState>,
    Query(query): Query<TurnoQuery>,
) -> Result<Response, ApiError> {
    if query.has_id() {
        let appointment = state.controller.get(query.id()?).await?;
        return Ok(Json(appointment).into_response());
    }

    let appointments = match query.fecha.as_deref().map(str::trim) {
        Some(fecha) if !fecha.is_empty() => {
            let date = parse_date(fecha).map_err(|_| ApiError::InvalidDate)?;
            state.controller.list_for_date(date).await?
        }
        _ => state.controller.list_all().await?,
    };
    Ok(Json(appointments).into_response())
}

/// PUT /api/turnos?id=N
pub async fn update_appointment(
    State(state): State<ApiState>,
    Query(query): Query<TurnoQuery>,
    body: Result<Json<AppointmentPatch>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
    let id = query.id()?;
    let Json(patch) = body.map_err(|e| {
        tracing::debug!(error = %e, "update body rejected");
        ApiError::MissingFields
    })?;
    Ok(Json(state.controller.update(id, patch).await?))
}

/// DELETE /api/turnos?id=N
pub async fn delete_appointment(
    State(state): State<ApiState>,
    Query(query): Query<TurnoQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.controller.delete(query.id()?).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// POST /api/turnos/confirmar?id=N
pub async fn confirm_appointment(
    State(state): State<ApiState>,
    Query(query): Query<TurnoQuery>,
) -> Result<Json<LifecycleOutcome>, ApiError> {
    Ok(Json(state.controller.confirm(query.id()?).await?))
}

/// POST /api/turnos/cancelar?id=N
pub async fn cancel_appointment(
    State(state): State<ApiState>,
    Query(query): Query<TurnoQuery>,
) -> Result<Json<LifecycleOutcome>, ApiError> {
    Ok(Json(state.controller.cancel(query.id()?).await?))
}

/// POST /api/turnos/recordatorio?id=N
pub async fn remind_appointment(
    State(state): State<ApiState>,
    Query(query): Query<TurnoQuery>,
) -> Result<Json<LifecycleOutcome>, ApiError> {
    Ok(Json(state.controller.remind(query.id()?).await?))
}
