// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment CRUD operations against the `turnos` table.

use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use taller_core::types::{parse_scheduled, scheduled_format};
use taller_core::{
    Appointment, AppointmentDraft, AppointmentId, AppointmentPatch, AppointmentStatus,
    TallerError,
};

use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, nombre, telefono, servicio, fecha, estado, notas, created_at";

fn row_to_appointment(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    let fecha: String = row.get(4)?;
    let scheduled_at = parse_scheduled(&fecha)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    let estado: String = row.get(5)?;
    let status = AppointmentStatus::from_str(&estado)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(Appointment {
        id: AppointmentId(row.get(0)?),
        customer_name: row.get(1)?,
        contact: row.get(2)?,
        service: row.get(3)?,
        scheduled_at,
        status,
        note: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn select_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Appointment>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM turnos WHERE id = ?1"),
        params![id],
        row_to_appointment,
    )
    .optional()
}

/// Insert a new appointment and return it with its assigned id.
pub async fn insert_appointment(
    db: &Database,
    draft: AppointmentDraft,
) -> Result<Appointment, TallerError> {
    let fecha = draft.scheduled_at.format(scheduled_format::FORMAT).to_string();
    let estado = draft.status.to_string();
    let inserted = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO turnos (nombre, telefono, servicio, fecha, estado, notas)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    draft.customer_name,
                    draft.contact,
                    draft.service,
                    fecha,
                    estado,
                    draft.note,
                ],
            )?;
            select_by_id(conn, conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)?;

    inserted.ok_or_else(|| TallerError::Internal("inserted appointment not readable".into()))
}

/// Get an appointment by id.
pub async fn get_appointment(
    db: &Database,
    id: AppointmentId,
) -> Result<Option<Appointment>, TallerError> {
    db.connection()
        .call(move |conn| select_by_id(conn, id.0))
        .await
        .map_err(map_tr_err)
}

/// List every appointment ordered by scheduled instant, oldest first.
pub async fn list_appointments(db: &Database) -> Result<Vec<Appointment>, TallerError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM turnos ORDER BY fecha ASC, id ASC"
            ))?;
            let rows = stmt.query_map([], row_to_appointment)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Set the status of an appointment. Returns `None` when no row matched.
pub async fn update_status(
    db: &Database,
    id: AppointmentId,
    status: AppointmentStatus,
) -> Result<Option<Appointment>, TallerError> {
    let estado = status.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE turnos SET estado = ?1 WHERE id = ?2",
                params![estado, id.0],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            select_by_id(conn, id.0)
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a partial update. Unset patch fields keep their stored value.
pub async fn update_appointment(
    db: &Database,
    id: AppointmentId,
    patch: AppointmentPatch,
) -> Result<Option<Appointment>, TallerError> {
    let estado = patch.status.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE turnos SET
                    nombre = COALESCE(?1, nombre),
                    telefono = COALESCE(?2, telefono),
                    servicio = COALESCE(?3, servicio),
                    estado = COALESCE(?4, estado),
                    notas = COALESCE(?5, notas)
                 WHERE id = ?6",
                params![
                    patch.customer_name,
                    patch.contact,
                    patch.service,
                    estado,
                    patch.note,
                    id.0,
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            select_by_id(conn, id.0)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete an appointment. Returns whether a row was removed.
pub async fn delete_appointment(db: &Database, id: AppointmentId) -> Result<bool, TallerError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute("DELETE FROM turnos WHERE id = ?1", params![id.0])?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}
