// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp notification backend for the Taller service.
//!
//! Implements [`NotificationGateway`] over the WhatsApp Business Cloud API,
//! addressing the customer's own phone number.

pub mod api;
pub mod phone;

use async_trait::async_trait;
use taller_config::model::{MessagingConfig, WhatsAppConfig};
use taller_core::error::TallerError;
use taller_core::traits::{NotificationGateway, PluginAdapter};
use taller_core::types::{
    AdapterType, Appointment, DeliveryResult, HealthStatus, SimulationReason, TemplateKind,
};
use taller_core::TemplateSet;
use tracing::{debug, error, info};

pub use phone::normalize_phone;

use crate::api::WhatsAppClient;

enum Delivery {
    Live(WhatsAppClient),
    Simulated(SimulationReason),
}

/// WhatsApp backend implementing [`NotificationGateway`].
pub struct WhatsAppGateway {
    templates: TemplateSet,
    country_code: String,
    delivery: Delivery,
}

impl WhatsAppGateway {
    /// Creates a new WhatsApp gateway.
    ///
    /// Real sends need both the access token and the phone-number id.
    pub fn new(
        config: &WhatsAppConfig,
        messaging: &MessagingConfig,
        production: bool,
    ) -> Result<Self, TallerError> {
        let credentials = config
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .zip(
                config
                    .phone_number_id
                    .as_deref()
                    .filter(|p| !p.trim().is_empty()),
            );

        let delivery = match (
            SimulationReason::decide(production, credentials.is_some()),
            credentials,
        ) {
            (Some(reason), _) => Delivery::Simulated(reason),
            (None, Some((token, phone_number_id))) => Delivery::Live(WhatsAppClient::new(
                taller_http::build_client(messaging)?,
                &config.api_base_url,
                &config.api_version,
                phone_number_id,
                token,
            )),
            (None, None) => Delivery::Simulated(SimulationReason::MissingCredentials),
        };

        if let Delivery::Simulated(reason) = &delivery {
            info!(%reason, "whatsapp deliveries will be simulated");
        }

        Ok(Self {
            templates: TemplateSet::whatsapp(),
            country_code: config.country_code.clone(),
            delivery,
        })
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self.delivery, Delivery::Simulated(_))
    }
}

#[async_trait]
impl PluginAdapter for WhatsAppGateway {
    fn name(&self) -> &str {
        "whatsapp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    async fn health_check(&self) -> Result<HealthStatus, TallerError> {
        // The Cloud API has no side-effect-free check for message sending.
        Ok(match &self.delivery {
            Delivery::Simulated(reason) => reason.health("whatsapp"),
            Delivery::Live(_) => HealthStatus::Healthy,
        })
    }

    async fn shutdown(&self) -> Result<(), TallerError> {
        debug!("WhatsApp gateway shutting down");
        Ok(())
    }
}

#[async_trait]
impl NotificationGateway for WhatsAppGateway {
    fn channel(&self) -> &str {
        "whatsapp"
    }

    async fn send(&self, kind: TemplateKind, appointment: &Appointment) -> DeliveryResult {
        let to = normalize_phone(&appointment.contact, &self.country_code);
        let text = self.templates.render(kind, appointment);

        match &self.delivery {
            Delivery::Simulated(reason) => {
                info!(
                    id = appointment.id.0,
                    %kind,
                    %reason,
                    to = %to,
                    text = %text,
                    "simulated whatsapp message"
                );
                DeliveryResult::simulated()
            }
            Delivery::Live(client) => match client.send_text(&to, &text).await {
                Ok(message_id) => {
                    info!(id = appointment.id.0, %kind, ?message_id, "whatsapp message sent");
                    DeliveryResult::delivered(message_id)
                }
                Err(e) => {
                    error!(id = appointment.id.0, %kind, error = %e, "whatsapp send failed");
                    DeliveryResult::from_error(&e)
                }
            },
        }
    }
}
