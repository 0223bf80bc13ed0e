// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the store, the notification gateway and the controller from config.
//!
//! Both are chosen once at startup and fixed for the process lifetime.

use std::sync::Arc;

use tracing::info;

use taller_config::{MessagingChannel, TallerConfig};
use taller_core::{AppointmentStore, NotificationGateway, TallerError};
use taller_lifecycle::AppointmentController;
use taller_storage::{MemoryStore, SqliteStore};
use taller_telegram::TelegramGateway;
use taller_whatsapp::WhatsAppGateway;

/// In-memory sample data in development, SQLite in production.
pub async fn build_store(config: &TallerConfig) -> Result<Arc<dyn AppointmentStore>, TallerError> {
    if config.is_production() {
        let store = SqliteStore::open(config.storage.clone()).await?;
        info!(path = %config.storage.database_path, "using SQLite appointment store");
        Ok(Arc::new(store))
    } else {
        info!("using in-memory appointment store with sample data");
        Ok(Arc::new(MemoryStore::with_samples()))
    }
}

/// The backend selected by `messaging.channel`.
pub fn build_notifier(config: &TallerConfig) -> Result<Arc<dyn NotificationGateway>, TallerError> {
    let production = config.is_production();
    let notifier: Arc<dyn NotificationGateway> = match config.messaging.channel {
        MessagingChannel::Telegram => Arc::new(TelegramGateway::new(
            &config.telegram,
            &config.messaging,
            production,
        )?),
        MessagingChannel::Whatsapp => Arc::new(WhatsAppGateway::new(
            &config.whatsapp,
            &config.messaging,
            production,
        )?),
    };
    info!(channel = %config.messaging.channel, "notification channel selected");
    Ok(notifier)
}

pub async fn build_controller(config: &TallerConfig) -> Result<AppointmentController, TallerError> {
    let store = build_store(config).await?;
    let notifier = build_notifier(config)?;
    Ok(AppointmentController::new(store, notifier))
}
