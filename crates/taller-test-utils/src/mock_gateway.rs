// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notification gateway for deterministic testing.
//!
//! `MockGateway` implements `NotificationGateway`, renders with a real
//! template set, and captures every send for assertion in tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use taller_core::traits::{NotificationGateway, PluginAdapter};
use taller_core::types::{AdapterType, Appointment, DeliveryResult, HealthStatus, TemplateKind};
use taller_core::{TallerError, TemplateSet};

/// One captured `send` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub kind: TemplateKind,
    pub appointment: Appointment,
    pub text: String,
}

/// A mock gateway for testing.
///
/// Sends succeed with sequential message ids unless a failure was
/// configured with [`MockGateway::failing`] or [`MockGateway::set_failure`].
pub struct MockGateway {
    templates: TemplateSet,
    sent: Arc<Mutex<Vec<SentNotification>>>,
    failure: Mutex<Option<String>>,
}

impl MockGateway {
    /// Create a mock that succeeds and renders WhatsApp texts.
    pub fn new() -> Self {
        Self {
            templates: TemplateSet::whatsapp(),
            sent: Arc::new(Mutex::new(Vec::new())),
            failure: Mutex::new(None),
        }
    }

    /// Create a mock whose sends all fail with `error`.
    pub fn failing(error: &str) -> Self {
        Self {
            failure: Mutex::new(Some(error.to_string())),
            ..Self::new()
        }
    }

    /// Switch failure mode on (`Some`) or off (`None`).
    pub async fn set_failure(&self, error: Option<&str>) {
        *self.failure.lock().await = error.map(str::to_string);
    }

    /// Get all notifications passed to `send()`.
    pub async fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sends, failed ones included.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Clear all captured sends.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    async fn health_check(&self) -> Result<HealthStatus, TallerError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TallerError> {
        Ok(())
    }
}

#[async_trait]
impl NotificationGateway for MockGateway {
    fn channel(&self) -> &str {
        "mock"
    }

    async fn send(&self, kind: TemplateKind, appointment: &Appointment) -> DeliveryResult {
        let text = self.templates.render(kind, appointment);
        let mut sent = self.sent.lock().await;
        sent.push(SentNotification {
            kind,
            appointment: appointment.clone(),
            text,
        });

        match self.failure.lock().await.as_deref() {
            Some(error) => DeliveryResult::failed(error),
            None => DeliveryResult::delivered(Some(format!("mock-{}", sent.len()))),
        }
    }
}
