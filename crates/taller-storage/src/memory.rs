// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory appointment store used in development mode.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use taller_core::{
    AdapterType, Appointment, AppointmentDraft, AppointmentId, AppointmentPatch,
    AppointmentStatus, AppointmentStore, HealthStatus, PluginAdapter, TallerError,
};

/// Process-local store. Contents are lost on restart.
///
/// New ids are one past the largest id currently held.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Appointment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with the three development sample appointments.
    pub fn with_samples() -> Self {
        Self {
            records: RwLock::new(sample_appointments()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn sample_at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .unwrap_or_default()
}

/// Sample data shown by a fresh development server.
pub fn sample_appointments() -> Vec<Appointment> {
    vec![
        Appointment {
            id: AppointmentId(1),
            customer_name: "Juan Pérez".into(),
            contact: "11 2345 6789".into(),
            service: "Cambio de aceite".into(),
            scheduled_at: sample_at(2025, 4, 10, 10, 0),
            status: AppointmentStatus::Confirmed,
            note: Some("Aceite sintético".into()),
            created_at: None,
        },
        Appointment {
            id: AppointmentId(2),
            customer_name: "María López".into(),
            contact: "11 9876 5432".into(),
            service: "Alineación y balanceo".into(),
            scheduled_at: sample_at(2025, 4, 10, 14, 30),
            status: AppointmentStatus::Pending,
            note: None,
            created_at: None,
        },
        Appointment {
            id: AppointmentId(3),
            customer_name: "Carlos Rodríguez".into(),
            contact: "11 5555 8888".into(),
            service: "Diagnóstico por falla".into(),
            scheduled_at: sample_at(2025, 4, 11, 9, 0),
            status: AppointmentStatus::Confirmed,
            note: Some("El auto hace un ruido extraño al frenar".into()),
            created_at: None,
        },
    ]
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, TallerError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TallerError> {
        Ok(())
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn create(&self, draft: AppointmentDraft) -> Result<Appointment, TallerError> {
        let mut records = self.records.write().await;
        let next_id = records.iter().map(|a| a.id.0).max().unwrap_or(0) + 1;
        let appointment = Appointment {
            id: AppointmentId(next_id),
            customer_name: draft.customer_name,
            contact: draft.contact,
            service: draft.service,
            scheduled_at: draft.scheduled_at,
            status: draft.status,
            note: draft.note,
            created_at: Some(Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()),
        };
        records.push(appointment.clone());
        debug!(id = next_id, "appointment stored in memory");
        Ok(appointment)
    }

    async fn get(&self, id: AppointmentId) -> Result<Option<Appointment>, TallerError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Appointment>, TallerError> {
        let mut all = self.records.read().await.clone();
        all.sort_by_key(|a| (a.scheduled_at, a.id));
        Ok(all)
    }

    async fn update_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, TallerError> {
        self.update(id, AppointmentPatch::status(status)).await
    }

    async fn update(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Option<Appointment>, TallerError> {
        let mut records = self.records.write().await;
        Ok(records.iter_mut().find(|a| a.id == id).map(|appointment| {
            patch.apply_to(appointment);
            appointment.clone()
        }))
    }

    async fn delete(&self, id: AppointmentId) -> Result<bool, TallerError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|a| a.id != id);
        Ok(records.len() < before)
    }
}
