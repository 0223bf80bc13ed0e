// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common request and record builders.

use chrono::{NaiveDate, NaiveDateTime};
use taller_core::{Appointment, AppointmentId, AppointmentStatus, NewAppointment};

/// Wall-clock instant in the shop's local time.
///
/// # Panics
///
/// Panics on an invalid date or time.
pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .expect("valid fixture date")
}

/// The booking used throughout the scenarios: Juan Perez, oil change, 2025-04-10 10:00.
pub fn booking() -> NewAppointment {
    NewAppointment {
        customer_name: "Juan Perez".into(),
        contact: "1122334455".into(),
        service: "Cambio de aceite".into(),
        scheduled_at: Some(at(2025, 4, 10, 10, 0)),
        status: None,
        note: None,
    }
}

/// A stored appointment with the given id and instant.
pub fn appointment(id: i64, scheduled_at: NaiveDateTime) -> Appointment {
    Appointment {
        id: AppointmentId(id),
        customer_name: format!("Cliente {id}"),
        contact: "11 2345 6789".into(),
        service: "Revisión general".into(),
        scheduled_at,
        status: AppointmentStatus::Pending,
        note: None,
        created_at: None,
    }
}
