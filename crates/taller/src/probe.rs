// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taller probe` command implementation.
//!
//! Sends one notification for a sample appointment scheduled now, through
//! the configured channel, and prints the delivery result.

use chrono::{NaiveDateTime, Timelike};

use taller_config::TallerConfig;
use taller_core::{Appointment, AppointmentStatus, TallerError, TemplateKind};
use taller_storage::memory::sample_appointments;

use crate::bootstrap;

/// Runs the `taller probe` command. Fails when the delivery fails.
pub async fn run_probe(
    config: &TallerConfig,
    kind: TemplateKind,
    telefono: Option<String>,
) -> Result<(), TallerError> {
    let notifier = bootstrap::build_notifier(config)?;
    let appointment = probe_appointment(telefono, chrono::Local::now().naive_local())?;

    eprintln!(
        "taller: sending {kind} to {} via {}",
        appointment.contact,
        notifier.channel()
    );
    let result = notifier.send(kind, &appointment).await;

    let rendered = serde_json::to_string_pretty(&result)
        .map_err(|e| TallerError::Internal(format!("failed to render result: {e}")))?;
    println!("{rendered}");

    if result.success {
        Ok(())
    } else {
        Err(TallerError::Delivery {
            message: result.error.unwrap_or_else(|| "delivery failed".to_string()),
            source: None,
        })
    }
}

/// The first sample appointment, confirmed and rescheduled to `now`.
fn probe_appointment(
    telefono: Option<String>,
    now: NaiveDateTime,
) -> Result<Appointment, TallerError> {
    let mut appointment = sample_appointments()
        .into_iter()
        .next()
        .ok_or_else(|| TallerError::Internal("no sample appointment".to_string()))?;

    appointment.scheduled_at = now
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    appointment.status = AppointmentStatus::Confirmed;
    if let Some(telefono) = telefono.filter(|t| !t.trim().is_empty()) {
        appointment.contact = telefono;
    }
    Ok(appointment)
}
