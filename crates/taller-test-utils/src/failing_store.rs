// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store whose every operation fails, for exercising error paths.

use async_trait::async_trait;

use taller_core::traits::{AppointmentStore, PluginAdapter};
use taller_core::types::{
    AdapterType, Appointment, AppointmentDraft, AppointmentId, AppointmentPatch,
    AppointmentStatus, HealthStatus,
};
use taller_core::TallerError;

#[derive(Debug, Default)]
pub struct FailingStore;

fn unavailable() -> TallerError {
    TallerError::storage(std::io::Error::other("store unavailable"))
}

#[async_trait]
impl PluginAdapter for FailingStore {
    fn name(&self) -> &str {
        "failing-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, TallerError> {
        Ok(HealthStatus::Unhealthy("store unavailable".into()))
    }

    async fn shutdown(&self) -> Result<(), TallerError> {
        Ok(())
    }
}

#[async_trait]
impl AppointmentStore for FailingStore {
    async fn create(&self, _draft: AppointmentDraft) -> Result<Appointment, TallerError> {
        Err(unavailable())
    }

    async fn get(&self, _id: AppointmentId) -> Result<Option<Appointment>, TallerError> {
        Err(unavailable())
    }

    async fn list(&self) -> Result<Vec<Appointment>, TallerError> {
        Err(unavailable())
    }

    async fn update_status(
        &self,
        _id: AppointmentId,
        _status: AppointmentStatus,
    ) -> Result<Option<Appointment>, TallerError> {
        Err(unavailable())
    }

    async fn update(
        &self,
        _id: AppointmentId,
        _patch: AppointmentPatch,
    ) -> Result<Option<Appointment>, TallerError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: AppointmentId) -> Result<bool, TallerError> {
        Err(unavailable())
    }
}
