// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment store trait for persistence backends (SQLite, in-memory).

use async_trait::async_trait;

use crate::error::TallerError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Appointment, AppointmentDraft, AppointmentId, AppointmentPatch, AppointmentStatus,
};

/// Keyed storage of appointment records.
///
/// Lookups of a missing id return `Ok(None)` (or `Ok(false)` for delete);
/// `Err` is reserved for backend failures.
#[async_trait]
pub trait AppointmentStore: PluginAdapter {
    /// Persists a draft and returns the record with its newly assigned id.
    async fn create(&self, draft: AppointmentDraft) -> Result<Appointment, TallerError>;

    /// Fetches a single appointment.
    async fn get(&self, id: AppointmentId) -> Result<Option<Appointment>, TallerError>;

    /// All appointments, ordered by scheduled instant ascending.
    async fn list(&self) -> Result<Vec<Appointment>, TallerError>;

    /// Sets the status of an appointment and returns the updated record.
    async fn update_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, TallerError>;

    /// Applies a partial update and returns the updated record.
    async fn update(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Option<Appointment>, TallerError>;

    /// Removes an appointment. Returns whether a record was removed.
    async fn delete(&self, id: AppointmentId) -> Result<bool, TallerError>;
}
