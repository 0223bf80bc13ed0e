// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message templates and placeholder substitution.
//!
//! Templates contain literal tokens (`[nombre]`, `[servicio]`, `[fecha]`,
//! `[hora]`, `[telefono]`). Each token is replaced at its first occurrence
//! only; later repeats are left verbatim.

use chrono::{Locale, NaiveDateTime};

use crate::types::{Appointment, TemplateKind};

/// Locale used for weekday and month names in `[fecha]`.
pub const DATE_LOCALE: Locale = Locale::es_AR;

/// The three message texts used by one notification backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    pub confirmation: String,
    pub reminder: String,
    pub cancellation: String,
}

impl TemplateSet {
    /// Admin-facing texts pushed to the shop's chat.
    pub fn telegram() -> Self {
        Self {
            confirmation: "✨ Nuevo turno cargado por [nombre]:\n\
                           ⚙ Servicio: [servicio]\n\
                           🗓 Fecha: [fecha] a las [hora]\n\
                           📞 Teléfono: [telefono]"
                .to_string(),
            reminder: "⏰ Recordatorio: Mañana [fecha] a las [hora] tenés un turno de [nombre] \
                       para [servicio]."
                .to_string(),
            cancellation: "❌ Cancelado: [nombre] canceló su turno para [servicio] del [fecha] \
                           a las [hora]."
                .to_string(),
        }
    }

    /// Customer-facing texts sent to the appointment's phone number.
    pub fn whatsapp() -> Self {
        Self {
            confirmation: "¡Hola [nombre]! Tu turno para [servicio] ha sido confirmado para el \
                           [fecha] a las [hora]. Te esperamos en Borriello Mecánica. \
                           Responde OK para confirmar."
                .to_string(),
            reminder: "¡Hola [nombre]! Te recordamos que mañana [fecha] a las [hora] tienes \
                       turno para [servicio]. ¡Te esperamos!"
                .to_string(),
            cancellation: "¡Hola [nombre]! Tu turno para [servicio] del [fecha] a las [hora] ha \
                           sido cancelado. Por favor, comunícate con nosotros para reprogramar."
                .to_string(),
        }
    }

    pub fn get(&self, kind: TemplateKind) -> &str {
        match kind {
            TemplateKind::Confirmation => &self.confirmation,
            TemplateKind::Reminder => &self.reminder,
            TemplateKind::Cancellation => &self.cancellation,
        }
    }

    /// Renders the template of the given kind for an appointment.
    pub fn render(&self, kind: TemplateKind, appointment: &Appointment) -> String {
        render(self.get(kind), appointment)
    }
}

/// Full weekday, day of month, and month name, e.g. `jueves 10 de abril`.
pub fn format_date(at: &NaiveDateTime) -> String {
    at.and_utc()
        .format_localized("%A %-d de %B", DATE_LOCALE)
        .to_string()
}

/// Zero-padded 24-hour `HH:MM`.
pub fn format_time(at: &NaiveDateTime) -> String {
    at.format("%H:%M").to_string()
}

/// Substitutes appointment fields into a template.
pub fn render(template: &str, appointment: &Appointment) -> String {
    let substitutions = [
        ("[nombre]", appointment.first_name().to_string()),
        ("[servicio]", appointment.service.clone()),
        ("[fecha]", format_date(&appointment.scheduled_at)),
        ("[hora]", format_time(&appointment.scheduled_at)),
        ("[telefono]", appointment.contact.clone()),
    ];

    substitutions
        .iter()
        .fold(template.to_string(), |text, (token, value)| {
            text.replacen(token, value, 1)
        })
}
