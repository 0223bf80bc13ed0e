// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment lifecycle controller for the Taller service.
//!
//! The controller owns every state change of an appointment and fires the
//! matching notification afterwards. Store failures abort an operation;
//! delivery failures never do.

pub mod controller;
pub mod recording;

pub use controller::{AppointmentController, LifecycleOutcome, filter_for_date};
