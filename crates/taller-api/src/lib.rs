// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON HTTP API for the Taller appointment service.
//!
//! Public routes serve health, metrics and the customer booking form.
//! Admin routes list, edit and delete appointments and trigger the
//! confirm, cancel and reminder notifications.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use error::ApiError;
pub use server::{ApiState, HealthState, ServerConfig, router, start_server};
