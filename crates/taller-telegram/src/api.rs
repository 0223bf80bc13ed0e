// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal Telegram Bot API client: `sendMessage` and `getMe`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use taller_core::TallerError;
use tracing::debug;

/// Parse mode sent with every message.
pub const PARSE_MODE: &str = "Markdown";

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'a str,
}

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// HTTP client bound to one bot token.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(http: reqwest::Client, base_url: &str, token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Posts `text` to `chat_id`.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<SentMessage, TallerError> {
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode: PARSE_MODE,
        };
        let request = self.http.post(self.method_url("sendMessage")).json(&body);
        self.execute(request).await
    }

    /// Verifies the token by fetching the bot's own user.
    pub async fn get_me(&self) -> Result<BotUser, TallerError> {
        let request = self.http.get(self.method_url("getMe"));
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, TallerError> {
        // The token is part of the URL; strip it from transport errors.
        let response = request.send().await.map_err(|e| {
            let e = e.without_url();
            TallerError::Delivery {
                message: format!("Error Telegram: {e}"),
                source: Some(Box::new(e)),
            }
        })?;

        let status = response.status();
        debug!(status = %status, "telegram response received");
        let body = response.text().await.unwrap_or_default();

        let parsed: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            TallerError::Delivery {
                message: format!("Error Telegram: HTTP {status}"),
                source: Some(Box::new(e)),
            }
        })?;

        match parsed {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } if status.is_success() => Ok(result),
            ApiResponse { description, .. } => Err(TallerError::Delivery {
                message: format!(
                    "Error Telegram: {}",
                    description.unwrap_or_else(|| format!("HTTP {status}"))
                ),
                source: None,
            }),
        }
    }
}
