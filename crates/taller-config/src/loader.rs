// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./taller.toml` > `~/.config/taller/taller.toml` > `/etc/taller/taller.toml`
//! with environment variable overrides via legacy deployment names and the `TALLER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TallerConfig;

/// Top-level sections addressable through `TALLER_<SECTION>_<KEY>`.
const SECTIONS: &[&str] = &["app", "messaging", "telegram", "whatsapp", "storage", "server"];

/// Environment names used by earlier deployments, lowest precedence first.
///
/// The `NEXT_PUBLIC_` variants are merged before the plain names so the plain
/// names win when both are set.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("next_public_telegram_bot_token", "telegram.bot_token"),
    ("next_public_telegram_admin_id", "telegram.admin_chat_id"),
    ("node_env", "app.environment"),
    ("canal_mensajeria", "messaging.channel"),
    ("telegram_bot_token", "telegram.bot_token"),
    ("telegram_admin_id", "telegram.admin_chat_id"),
    ("whatsapp_token", "whatsapp.token"),
    ("whatsapp_phone_number_id", "whatsapp.phone_number_id"),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/taller/taller.toml` (system-wide)
/// 3. `~/.config/taller/taller.toml` (user XDG config)
/// 4. `./taller.toml` (local directory)
/// 5. Legacy environment names (`NODE_ENV`, `CANAL_MENSAJERIA`, ...)
/// 6. `TALLER_*` environment variables
pub fn load_config() -> Result<TallerConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TallerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TallerConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TallerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TallerConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TallerConfig::default()))
        .merge(Toml::file("/etc/taller/taller.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("taller/taller.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("taller.toml"))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// Maps the unprefixed legacy names onto their config keys.
///
/// Blank values are skipped so `CANAL_MENSAJERIA=` falls back to the default
/// channel instead of failing extraction.
fn legacy_env_provider() -> Figment {
    LEGACY_ENV
        .iter()
        .filter(|(name, _)| legacy_value_is_set(name))
        .fold(Figment::new(), |figment, &(name, key)| {
            figment.merge(Env::raw().only(&[name]).map(move |_| key.into()))
        })
}

fn legacy_value_is_set(name: &str) -> bool {
    std::env::vars()
        .any(|(var, value)| var.eq_ignore_ascii_case(name) && !value.trim().is_empty())
}

/// Environment variables that can set the dotted `key`, lowest precedence first.
pub(crate) fn env_names_for(key: &str) -> Vec<String> {
    LEGACY_ENV
        .iter()
        .filter(|(_, target)| *target == key)
        .map(|(name, _)| name.to_ascii_uppercase())
        .chain(std::iter::once(format!(
            "TALLER_{}",
            key.replace('.', "_").to_ascii_uppercase()
        )))
        .collect()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `TALLER_TELEGRAM_BOT_TOKEN` must map to `telegram.bot_token`,
/// not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("TALLER_").map(|key| {
        // `key` is the env var name with prefix stripped, case preserved.
        // Example: TALLER_TELEGRAM_BOT_TOKEN -> "telegram.bot_token"
        let key_str = key.as_str().to_ascii_lowercase();
        SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|field| format!("{section}.{field}"))
            })
            .unwrap_or(key_str)
            .into()
    })
}
