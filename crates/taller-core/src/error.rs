// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Taller appointment service.

use thiserror::Error;

/// The primary error type used across all Taller adapters and the lifecycle controller.
///
/// Store and validation errors abort the operation that raised them. Delivery
/// errors never cross the [`NotificationGateway`](crate::NotificationGateway)
/// boundary; backends convert them into a failed
/// [`DeliveryResult`](crate::DeliveryResult).
#[derive(Debug, Error)]
pub enum TallerError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Appointment store errors (connection, query failure, corrupt row).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No appointment exists with the requested identifier.
    #[error("appointment {id} not found")]
    NotFound { id: i64 },

    /// Outbound notification failed (transport error or non-success HTTP status).
    #[error("delivery error: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Required booking fields are missing or empty.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TallerError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TallerError::Storage {
            source: Box::new(err),
        }
    }

    /// Returns true when the error means the appointment does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TallerError::NotFound { .. })
    }
}
