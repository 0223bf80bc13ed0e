// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram notification backend for the Taller service.
//!
//! Implements [`NotificationGateway`] by pushing the rendered text to the
//! shop administrator's chat through the Bot API. The customer is never
//! addressed directly.

pub mod api;

use async_trait::async_trait;
use taller_config::model::{MessagingConfig, TelegramConfig};
use taller_core::error::TallerError;
use taller_core::traits::{NotificationGateway, PluginAdapter};
use taller_core::types::{
    AdapterType, Appointment, DeliveryResult, HealthStatus, SimulationReason, TemplateKind,
};
use taller_core::TemplateSet;
use tracing::{debug, error, info};

use crate::api::TelegramClient;

enum Delivery {
    Live {
        client: TelegramClient,
        chat_id: String,
    },
    Simulated(SimulationReason),
}

/// Telegram backend implementing [`NotificationGateway`].
///
/// Whether sends are real or simulated is decided once at construction from
/// the environment and the presence of both the bot token and admin chat id.
pub struct TelegramGateway {
    templates: TemplateSet,
    delivery: Delivery,
}

impl TelegramGateway {
    /// Creates a new Telegram gateway.
    pub fn new(
        config: &TelegramConfig,
        messaging: &MessagingConfig,
        production: bool,
    ) -> Result<Self, TallerError> {
        let credentials = config
            .bot_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .zip(
                config
                    .admin_chat_id
                    .as_deref()
                    .filter(|c| !c.trim().is_empty()),
            );

        let delivery = match (
            SimulationReason::decide(production, credentials.is_some()),
            credentials,
        ) {
            (Some(reason), _) => Delivery::Simulated(reason),
            (None, Some((token, chat_id))) => Delivery::Live {
                client: TelegramClient::new(
                    taller_http::build_client(messaging)?,
                    &config.api_base_url,
                    token,
                ),
                chat_id: chat_id.to_string(),
            },
            (None, None) => Delivery::Simulated(SimulationReason::MissingCredentials),
        };

        if let Delivery::Simulated(reason) = &delivery {
            info!(%reason, "telegram deliveries will be simulated");
        }

        Ok(Self {
            templates: TemplateSet::telegram(),
            delivery,
        })
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self.delivery, Delivery::Simulated(_))
    }
}

#[async_trait]
impl PluginAdapter for TelegramGateway {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    async fn health_check(&self) -> Result<HealthStatus, TallerError> {
        match &self.delivery {
            Delivery::Simulated(reason) => Ok(reason.health("telegram")),
            // Check if the bot token is valid by calling getMe.
            Delivery::Live { client, .. } => match client.get_me().await {
                Ok(_) => Ok(HealthStatus::Healthy),
                Err(e) => Ok(HealthStatus::Unhealthy(format!(
                    "Telegram bot unreachable: {e}"
                ))),
            },
        }
    }

    async fn shutdown(&self) -> Result<(), TallerError> {
        debug!("Telegram gateway shutting down");
        Ok(())
    }
}

#[async_trait]
impl NotificationGateway for TelegramGateway {
    fn channel(&self) -> &str {
        "telegram"
    }

    async fn send(&self, kind: TemplateKind, appointment: &Appointment) -> DeliveryResult {
        let text = self.templates.render(kind, appointment);

        match &self.delivery {
            Delivery::Simulated(reason) => {
                info!(
                    id = appointment.id.0,
                    %kind,
                    %reason,
                    text = %text,
                    "simulated telegram message"
                );
                DeliveryResult::simulated()
            }
            Delivery::Live { client, chat_id } => {
                match client.send_message(chat_id, &text).await {
                    Ok(sent) => {
                        info!(
                            id = appointment.id.0,
                            %kind,
                            message_id = sent.message_id,
                            "telegram message sent"
                        );
                        DeliveryResult::delivered(Some(sent.message_id.to_string()))
                    }
                    Err(e) => {
                        error!(id = appointment.id.0, %kind, error = %e, "telegram send failed");
                        DeliveryResult::from_error(&e)
                    }
                }
            }
        }
    }
}
