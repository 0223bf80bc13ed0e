// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taller list` command implementation.

use taller_config::TallerConfig;
use taller_core::types::parse_date;
use taller_core::{Appointment, TallerError};

use crate::bootstrap;

/// Prints every appointment, or those on `fecha`, as a table or JSON.
pub async fn run_list(
    config: &TallerConfig,
    fecha: Option<&str>,
    json: bool,
) -> Result<(), TallerError> {
    let controller = bootstrap::build_controller(config).await?;
    let appointments = match fecha {
        Some(raw) => controller.list_for_date(parse_date(raw)?).await?,
        None => controller.list_all().await?,
    };

    if json {
        let rendered = serde_json::to_string_pretty(&appointments)
            .map_err(|e| TallerError::Internal(format!("failed to render appointments: {e}")))?;
        println!("{rendered}");
    } else if appointments.is_empty() {
        println!("no appointments");
    } else {
        for appointment in &appointments {
            println!("{}", format_row(appointment));
        }
    }
    Ok(())
}

fn format_row(appointment: &Appointment) -> String {
    format!(
        "{:>4}  {}  {:<10}  {:<24}  {:<16}  {}",
        appointment.id.0,
        appointment.scheduled_at.format("%Y-%m-%d %H:%M"),
        appointment.status.to_string(),
        appointment.customer_name,
        appointment.contact,
        appointment.service
    )
}
