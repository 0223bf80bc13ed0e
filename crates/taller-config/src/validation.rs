// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid IP addresses, non-empty paths, and well-formed API versions.

use crate::diagnostic::ConfigError;
use crate::model::TallerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TallerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.app.log_level.to_ascii_lowercase().as_str()) {
        invalid(format!(
            "app.log_level `{}` must be one of: {}",
            config.app.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let addr = config.server.bind_address.trim();
    if addr.is_empty() {
        invalid("server.bind_address must not be empty".to_string());
    } else {
        // Accept valid IPv4, IPv6, or hostname patterns
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            invalid(format!(
                "server.bind_address `{addr}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.server.port == 0 {
        invalid("server.port must be between 1 and 65535".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".to_string());
    }

    if config.messaging.request_timeout_secs == Some(0) {
        invalid("messaging.request_timeout_secs must be positive when set".to_string());
    }

    let code = &config.whatsapp.country_code;
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        invalid(format!(
            "whatsapp.country_code `{code}` must contain digits only"
        ));
    }

    if !is_api_version(&config.whatsapp.api_version) {
        invalid(format!(
            "whatsapp.api_version `{}` must look like `v18.0`",
            config.whatsapp.api_version
        ));
    }

    for (key, url) in [
        ("telegram.api_base_url", &config.telegram.api_base_url),
        ("whatsapp.api_base_url", &config.whatsapp.api_base_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            invalid(format!("{key} `{url}` must be an http(s) URL"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `vN.M` with both parts numeric.
fn is_api_version(version: &str) -> bool {
    let Some(rest) = version.strip_prefix('v') else {
        return false;
    };
    let mut parts = rest.split('.');
    let (Some(major), Some(minor), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    [major, minor]
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}
