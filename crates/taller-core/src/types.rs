// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the lifecycle controller.
//!
//! Field names on the wire follow the record interchange shape the booking
//! form and admin dashboard depend on: `{id, nombre, telefono, servicio,
//! fecha, estado, notas?, created_at?}`.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::TallerError;

/// Store-assigned appointment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub i64);

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Appointment status. No other value is representable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AppointmentStatus {
    #[strum(serialize = "pendiente")]
    #[serde(rename = "pendiente")]
    Pending,
    #[strum(serialize = "confirmado")]
    #[serde(rename = "confirmado")]
    Confirmed,
    #[strum(serialize = "cancelado")]
    #[serde(rename = "cancelado")]
    Cancelled,
}

/// A scheduled service booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,

    #[serde(rename = "nombre")]
    pub customer_name: String,

    /// Phone number or chat handle, unvalidated.
    #[serde(rename = "telefono")]
    pub contact: String,

    #[serde(rename = "servicio")]
    pub service: String,

    /// Shop-local wall-clock time of the appointment.
    #[serde(rename = "fecha", with = "scheduled_format")]
    pub scheduled_at: NaiveDateTime,

    #[serde(rename = "estado")]
    pub status: AppointmentStatus,

    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Set by the store on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Appointment {
    /// First whitespace-delimited token of the customer name, or `""`.
    pub fn first_name(&self) -> &str {
        self.customer_name.split_whitespace().next().unwrap_or("")
    }

    /// Calendar day of the scheduled instant.
    pub fn scheduled_date(&self) -> NaiveDate {
        self.scheduled_at.date()
    }
}

/// A booking request as submitted by the booking form.
///
/// Every field is optional on the wire so that missing fields surface as a
/// [`TallerError::Validation`] from [`NewAppointment::validate`] rather than a
/// deserialization failure. Any `estado` supplied by the caller is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    #[serde(rename = "nombre", default)]
    pub customer_name: String,

    #[serde(rename = "telefono", default)]
    pub contact: String,

    #[serde(rename = "servicio", default)]
    pub service: String,

    #[serde(
        rename = "fecha",
        default,
        with = "scheduled_format::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub scheduled_at: Option<NaiveDateTime>,

    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,

    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewAppointment {
    /// Checks required fields and produces a draft with status forced to pending.
    pub fn validate(self) -> Result<AppointmentDraft, TallerError> {
        let mut missing = Vec::new();
        if self.customer_name.trim().is_empty() {
            missing.push("nombre");
        }
        if self.contact.trim().is_empty() {
            missing.push("telefono");
        }
        if self.service.trim().is_empty() {
            missing.push("servicio");
        }
        let Some(scheduled_at) = self.scheduled_at else {
            missing.push("fecha");
            return Err(missing_fields(&missing));
        };
        if !missing.is_empty() {
            return Err(missing_fields(&missing));
        }

        Ok(AppointmentDraft {
            customer_name: self.customer_name,
            contact: self.contact,
            service: self.service,
            scheduled_at,
            status: AppointmentStatus::Pending,
            note: self.note.filter(|n| !n.is_empty()),
        })
    }
}

fn missing_fields(fields: &[&str]) -> TallerError {
    TallerError::Validation(format!("missing required fields: {}", fields.join(", ")))
}

/// A validated record ready to be inserted by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub customer_name: String,
    pub contact: String,
    pub service: String,
    pub scheduled_at: NaiveDateTime,
    pub status: AppointmentStatus,
    pub note: Option<String>,
}

/// Partial update applied by the admin flow.
///
/// The scheduled instant is deliberately absent: rescheduling replaces the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppointmentPatch {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,

    #[serde(rename = "servicio", default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,

    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AppointmentPatch {
    /// A patch that only changes the status.
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Rejects provided-but-empty required text fields.
    pub fn validate(&self) -> Result<(), TallerError> {
        let mut empty = Vec::new();
        for (name, value) in [
            ("nombre", &self.customer_name),
            ("telefono", &self.contact),
            ("servicio", &self.service),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                empty.push(name);
            }
        }
        if empty.is_empty() {
            Ok(())
        } else {
            Err(TallerError::Validation(format!(
                "fields must not be empty: {}",
                empty.join(", ")
            )))
        }
    }

    /// Applies the patch to an appointment in place.
    pub fn apply_to(&self, appointment: &mut Appointment) {
        if let Some(name) = &self.customer_name {
            appointment.customer_name = name.clone();
        }
        if let Some(contact) = &self.contact {
            appointment.contact = contact.clone();
        }
        if let Some(service) = &self.service {
            appointment.service = service.clone();
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        if let Some(note) = &self.note {
            appointment.note = Some(note.clone());
        }
    }
}

/// Which message text to render.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Confirmation,
    Reminder,
    Cancellation,
}

/// Outcome of a single notification send.
///
/// Serialized as `{success, messageId?, timestamp, error?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Prefix of synthetic message ids produced when delivery is simulated.
pub const SIMULATED_ID_PREFIX: &str = "dev_msg_";

impl DeliveryResult {
    /// The backend accepted the message.
    pub fn delivered(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message_id,
            timestamp: now_timestamp(),
            error: None,
        }
    }

    /// No network call was made; a synthetic id stands in for the real one.
    pub fn simulated() -> Self {
        Self::delivered(Some(format!(
            "{SIMULATED_ID_PREFIX}{}",
            Utc::now().timestamp_millis()
        )))
    }

    /// The send failed; the error text is kept for the caller.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            timestamp: now_timestamp(),
            error: Some(error.into()),
        }
    }

    /// A failed result carrying the error's message.
    pub fn from_error(err: &TallerError) -> Self {
        match err {
            TallerError::Delivery { message, .. } => Self::failed(message.clone()),
            other => Self::failed(other.to_string()),
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.message_id
            .as_deref()
            .is_some_and(|id| id.starts_with(SIMULATED_ID_PREFIX))
    }
}

/// Why a gateway simulates deliveries instead of calling its API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SimulationReason {
    #[strum(serialize = "non-production environment")]
    NonProduction,
    #[strum(serialize = "missing credentials")]
    MissingCredentials,
}

impl SimulationReason {
    /// `None` means real deliveries.
    pub fn decide(production: bool, has_credentials: bool) -> Option<Self> {
        if !production {
            Some(Self::NonProduction)
        } else if !has_credentials {
            Some(Self::MissingCredentials)
        } else {
            None
        }
    }

    /// Health reported by a gateway that is simulating.
    pub fn health(&self, channel: &str) -> HealthStatus {
        match self {
            Self::NonProduction => HealthStatus::Healthy,
            Self::MissingCredentials => HealthStatus::Degraded(format!(
                "{channel} credentials missing; deliveries are simulated"
            )),
        }
    }
}

fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

impl HealthStatus {
    /// Short label for health endpoints.
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded(_) => "degraded",
            HealthStatus::Unhealthy(_) => "unhealthy",
        }
    }
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Store,
    Notifier,
}

/// Parses a scheduled instant.
///
/// Accepts `YYYY-MM-DDTHH:MM[:SS[.fff]]` (with `T` or a space) and RFC 3339
/// timestamps; an offset, if present, is dropped after reading the local
/// wall-clock fields.
pub fn parse_scheduled(raw: &str) -> Result<NaiveDateTime, TallerError> {
    let raw = raw.trim();
    if let Ok(with_offset) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.naive_local());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| TallerError::Validation(format!("invalid fecha `{raw}`")))
}

/// Parses a calendar date (`YYYY-MM-DD`), also accepting a full timestamp.
pub fn parse_date(raw: &str) -> Result<NaiveDate, TallerError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| parse_scheduled(raw).map(|dt| dt.date()))
        .map_err(|_| TallerError::Validation(format!("invalid fecha `{raw}`")))
}

/// Serde codec for the `fecha` field.
pub mod scheduled_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_scheduled(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => s.collect_str(&v.format(super::FORMAT)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::super::parse_scheduled(&raw)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}
