// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder (Prometheus, statsd, etc.)
//! can collect these metrics. Without an installed recorder every call is a no-op.

use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use taller_core::{DeliveryResult, TallerError, TemplateKind};

/// Register all Taller metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "taller_appointments_total",
        "Appointment lifecycle operations completed"
    );
    describe_counter!(
        "taller_notifications_total",
        "Notification sends by channel, template kind and outcome"
    );
}

/// Install the Prometheus recorder globally and register descriptions.
///
/// Only one recorder can be installed per process.
pub fn install_recorder() -> Result<PrometheusHandle, TallerError> {
    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        TallerError::Internal(format!("failed to install Prometheus recorder: {e}"))
    })?;

    register_metrics();
    tracing::info!("prometheus metrics recorder installed");

    Ok(handle)
}

/// Record a completed controller operation (`create`, `confirm`, ...).
pub fn record_appointment(operation: &'static str) {
    metrics::counter!("taller_appointments_total", "operation" => operation).increment(1);
}

/// Record one notification send.
pub fn record_notification(channel: &str, kind: TemplateKind, result: &DeliveryResult) {
    metrics::counter!(
        "taller_notifications_total",
        "channel" => channel.to_string(),
        "kind" => kind.to_string(),
        "outcome" => outcome(result),
    )
    .increment(1);
}

/// `delivered`, `simulated` or `failed`.
pub fn outcome(result: &DeliveryResult) -> &'static str {
    if !result.success {
        "failed"
    } else if result.is_simulated() {
        "simulated"
    } else {
        "delivered"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_labels() {
        assert_eq!(outcome(&DeliveryResult::delivered(Some("7".into()))), "delivered");
        assert_eq!(outcome(&DeliveryResult::simulated()), "simulated");
        assert_eq!(outcome(&DeliveryResult::failed("boom")), "failed");
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        register_metrics();
        record_appointment("create");
        record_notification("telegram", TemplateKind::Reminder, &DeliveryResult::simulated());
    }
}
