// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! API errors with their HTTP status and `{"error": ...}` body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use taller_core::TallerError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API-level errors. The display text is what the client sees.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Faltan datos obligatorios")]
    MissingFields,
    #[error("ID no proporcionado")]
    MissingId,
    #[error("Fecha inválida")]
    InvalidDate,
    #[error("Turno no encontrado")]
    NotFound,
    /// Detail is logged, never returned.
    #[error("Error al procesar la solicitud")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::MissingId | ApiError::InvalidDate => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(detail, "request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<TallerError> for ApiError {
    fn from(err: TallerError) -> Self {
        match err {
            TallerError::NotFound { .. } => ApiError::NotFound,
            TallerError::Validation(_) => ApiError::MissingFields,
            other => ApiError::Internal(other.to_string()),
        }
    }
}
