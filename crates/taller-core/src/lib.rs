// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Taller appointment service.
//!
//! This crate provides the appointment model, error types, message templates,
//! and the adapter traits implemented by stores and notification backends.

pub mod error;
pub mod templates;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TallerError;
pub use templates::TemplateSet;
pub use types::{
    AdapterType, Appointment, AppointmentDraft, AppointmentId, AppointmentPatch,
    AppointmentStatus, DeliveryResult, HealthStatus, NewAppointment, SimulationReason,
    TemplateKind,
};

pub use traits::{AppointmentStore, NotificationGateway, PluginAdapter};
