// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification gateway trait for outbound messaging backends (Telegram, WhatsApp).

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::{Appointment, DeliveryResult, TemplateKind};

/// Renders a template for an appointment and delivers it over one channel.
///
/// `send` never fails: transport errors, API errors, and missing credentials
/// all come back as a [`DeliveryResult`] with `success == false` (or as a
/// simulated success outside production).
#[async_trait]
pub trait NotificationGateway: PluginAdapter {
    /// Channel label used in logs and metrics (`"telegram"`, `"whatsapp"`).
    fn channel(&self) -> &str;

    async fn send(&self, kind: TemplateKind, appointment: &Appointment) -> DeliveryResult;
}
