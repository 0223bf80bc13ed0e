// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Business Cloud API client for plain text messages.

use serde::{Deserialize, Serialize};
use taller_core::TallerError;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct TextBody<'a> {
    pub body: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SendTextRequest<'a> {
    pub messaging_product: &'a str,
    pub recipient_type: &'a str,
    pub to: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub text: TextBody<'a>,
}

impl<'a> SendTextRequest<'a> {
    pub fn new(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to,
            kind: "text",
            text: TextBody { body },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendTextResponse {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct MessageRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: Option<String>,
}

/// Client bound to one phone-number id and access token.
#[derive(Clone)]
pub struct WhatsAppClient {
    http: reqwest::Client,
    messages_url: String,
    token: String,
}

impl WhatsAppClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_version: &str,
        phone_number_id: &str,
        token: &str,
    ) -> Self {
        Self {
            http,
            messages_url: format!(
                "{}/{api_version}/{phone_number_id}/messages",
                base_url.trim_end_matches('/')
            ),
            token: token.to_string(),
        }
    }

    pub fn messages_url(&self) -> &str {
        &self.messages_url
    }

    /// Sends a text message. Returns the API's message id, if any.
    pub async fn send_text(&self, to: &str, body: &str) -> Result<Option<String>, TallerError> {
        let response = self
            .http
            .post(&self.messages_url)
            .bearer_auth(&self.token)
            .json(&SendTextRequest::new(to, body))
            .send()
            .await
            .map_err(|e| TallerError::Delivery {
                message: format!("Error al enviar mensaje: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "whatsapp response received");
        let text = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<SendTextResponse>(&text);

        if !status.is_success() {
            let reason = parsed
                .ok()
                .and_then(|p| p.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Error desconocido".to_string());
            return Err(TallerError::Delivery {
                message: format!("Error al enviar mensaje: {reason}"),
                source: None,
            });
        }

        // A 2xx body that is not the Cloud API envelope is not a confirmed send.
        let parsed = parsed.map_err(|e| TallerError::Delivery {
            message: format!("Error al enviar mensaje: respuesta inválida ({e})"),
            source: Some(Box::new(e)),
        })?;
        Ok(parsed.messages.into_iter().next().map(|m| m.id))
    }
}
