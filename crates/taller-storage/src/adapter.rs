// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the AppointmentStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use taller_config::model::StorageConfig;
use taller_core::{
    AdapterType, Appointment, AppointmentDraft, AppointmentId, AppointmentPatch,
    AppointmentStatus, AppointmentStore, HealthStatus, PluginAdapter, TallerError,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed appointment store.
///
/// Wraps a [`Database`] handle and delegates all operations to the typed
/// query module. The database is opened on the first call to
/// [`SqliteStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`SqliteStore::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Create and initialize in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, TallerError> {
        let store = Self::new(config);
        store.initialize().await?;
        Ok(store)
    }

    /// Opens the database file and runs migrations.
    pub async fn initialize(&self) -> Result<(), TallerError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| TallerError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, TallerError> {
        self.db.get().ok_or_else(|| TallerError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, TallerError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TallerError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl AppointmentStore for SqliteStore {
    async fn create(&self, draft: AppointmentDraft) -> Result<Appointment, TallerError> {
        queries::appointments::insert_appointment(self.db()?, draft).await
    }

    async fn get(&self, id: AppointmentId) -> Result<Option<Appointment>, TallerError> {
        queries::appointments::get_appointment(self.db()?, id).await
    }

    async fn list(&self) -> Result<Vec<Appointment>, TallerError> {
        queries::appointments::list_appointments(self.db()?).await
    }

    async fn update_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, TallerError> {
        queries::appointments::update_status(self.db()?, id, status).await
    }

    async fn update(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Option<Appointment>, TallerError> {
        queries::appointments::update_appointment(self.db()?, id, patch).await
    }

    async fn delete(&self, id: AppointmentId) -> Result<bool, TallerError> {
        queries::appointments::delete_appointment(self.db()?, id).await
    }
}
