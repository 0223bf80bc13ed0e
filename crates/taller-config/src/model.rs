// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Taller appointment service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level Taller configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TallerConfig {
    /// Deployment environment and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Which notification backend is active.
    #[serde(default)]
    pub messaging: MessagingConfig,

    /// Telegram bot settings (administrator notifications).
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// WhatsApp Business settings (customer notifications).
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Appointment store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP API settings.
    #[serde(default)]
    pub server: ServerConfig,
}

impl TallerConfig {
    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// In-memory sample data and simulated message delivery.
    #[default]
    #[serde(alias = "test")]
    Development,
    Production,
}

/// Application-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Notification backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagingChannel {
    #[default]
    Telegram,
    Whatsapp,
}

impl fmt::Display for MessagingChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagingChannel::Telegram => f.write_str("telegram"),
            MessagingChannel::Whatsapp => f.write_str("whatsapp"),
        }
    }
}

/// Messaging settings shared by both backends.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessagingConfig {
    #[serde(default)]
    pub channel: MessagingChannel,

    /// Per-request timeout for outbound API calls. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Telegram bot configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot API token. `None` makes every send simulated.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Chat that receives administrator notifications.
    #[serde(default, deserialize_with = "string_or_int")]
    pub admin_chat_id: Option<String>,

    #[serde(default = "default_telegram_api_base_url")]
    pub api_base_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            admin_chat_id: None,
            api_base_url: default_telegram_api_base_url(),
        }
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &redacted(&self.bot_token))
            .field("admin_chat_id", &self.admin_chat_id)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

fn default_telegram_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

/// WhatsApp Business Cloud API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Graph API access token. `None` makes every send simulated.
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default, deserialize_with = "string_or_int")]
    pub phone_number_id: Option<String>,

    #[serde(default = "default_whatsapp_api_version")]
    pub api_version: String,

    #[serde(default = "default_whatsapp_api_base_url")]
    pub api_base_url: String,

    /// Country calling code prefixed to recipient numbers that lack it.
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            token: None,
            phone_number_id: None,
            api_version: default_whatsapp_api_version(),
            api_base_url: default_whatsapp_api_base_url(),
            country_code: default_country_code(),
        }
    }
}

impl fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhatsAppConfig")
            .field("token", &redacted(&self.token))
            .field("phone_number_id", &self.phone_number_id)
            .field("api_version", &self.api_version)
            .field("api_base_url", &self.api_base_url)
            .field("country_code", &self.country_code)
            .finish()
    }
}

fn default_whatsapp_api_version() -> String {
    "v18.0".to_string()
}

fn default_whatsapp_api_base_url() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_country_code() -> String {
    "54".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("taller").join("taller.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("taller.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token for admin routes. Unset leaves them open in development
    /// and closed in production.
    #[serde(default)]
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            admin_token: None,
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("admin_token", &redacted(&self.admin_token))
            .finish()
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn redacted(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "[REDACTED]")
}

/// Accepts numeric identifiers written either as strings or integers.
fn string_or_int<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) if s.trim().is_empty() => None,
        Some(Raw::Text(s)) => Some(s),
        Some(Raw::Int(n)) => Some(n.to_string()),
        None => None,
    })
}
