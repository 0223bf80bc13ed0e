// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound HTTP client for the messaging backends.
//!
//! Both backends build their `reqwest::Client` here so the timeout and
//! user agent are applied the same way.

use std::time::Duration;

use taller_config::model::MessagingConfig;
use taller_core::TallerError;
use tracing::error;

/// User agent sent with every messaging API call.
pub const USER_AGENT: &str = concat!("taller/", env!("CARGO_PKG_VERSION"));

/// Build the client used for messaging API calls.
///
/// `messaging.request_timeout_secs` bounds each request; unset leaves
/// reqwest's default (no timeout).
pub fn build_client(messaging: &MessagingConfig) -> Result<reqwest::Client, TallerError> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(secs) = messaging.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(|e| {
        error!("failed to build HTTP client: {e}");
        TallerError::Delivery {
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        }
    })
}
