// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The appointment lifecycle controller.
//!
//! Each operation awaits the store to completion before the notification
//! send begins. Missing records surface as [`TallerError::NotFound`] on
//! every path, and notification failures are logged and counted but only
//! reported back through [`LifecycleOutcome::delivery`].

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use taller_core::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentStatus, AppointmentStore,
    DeliveryResult, NewAppointment, NotificationGateway, TallerError, TemplateKind,
};

use crate::recording::{record_appointment, record_notification};

/// An appointment after a notifying operation, with the send's result.
///
/// Serialized as `{turno, notificacion}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleOutcome {
    #[serde(rename = "turno")]
    pub appointment: Appointment,
    #[serde(rename = "notificacion")]
    pub delivery: DeliveryResult,
}

/// Coordinates the appointment store and the notification gateway.
///
/// No locking is applied between operations; concurrent writes to the same
/// id resolve as last-write-wins in the store.
#[derive(Clone)]
pub struct AppointmentController {
    store: Arc<dyn AppointmentStore>,
    notifier: Arc<dyn NotificationGateway>,
}

impl AppointmentController {
    pub fn new(store: Arc<dyn AppointmentStore>, notifier: Arc<dyn NotificationGateway>) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &Arc<dyn AppointmentStore> {
        &self.store
    }

    pub fn notifier(&self) -> &Arc<dyn NotificationGateway> {
        &self.notifier
    }

    /// Books a new appointment and sends the confirmation notification.
    ///
    /// Any status in `request` is ignored; new records are always pending.
    pub async fn create(&self, request: NewAppointment) -> Result<LifecycleOutcome, TallerError> {
        let draft = request.validate()?;
        let appointment = self.store.create(draft).await?;
        record_appointment("create");
        info!(
            id = appointment.id.0,
            scheduled_at = %appointment.scheduled_at,
            "appointment created"
        );

        let delivery = self.notify(TemplateKind::Confirmation, &appointment).await;
        Ok(LifecycleOutcome {
            appointment,
            delivery,
        })
    }

    /// Marks an appointment confirmed and sends the confirmation notification.
    pub async fn confirm(&self, id: AppointmentId) -> Result<LifecycleOutcome, TallerError> {
        self.transition(id, AppointmentStatus::Confirmed, TemplateKind::Confirmation, "confirm")
            .await
    }

    /// Marks an appointment cancelled and sends the cancellation notification.
    pub async fn cancel(&self, id: AppointmentId) -> Result<LifecycleOutcome, TallerError> {
        self.transition(id, AppointmentStatus::Cancelled, TemplateKind::Cancellation, "cancel")
            .await
    }

    /// Sends the reminder notification without touching the status.
    pub async fn remind(&self, id: AppointmentId) -> Result<LifecycleOutcome, TallerError> {
        let appointment = self.get(id).await?;
        record_appointment("remind");

        let delivery = self.notify(TemplateKind::Reminder, &appointment).await;
        Ok(LifecycleOutcome {
            appointment,
            delivery,
        })
    }

    pub async fn get(&self, id: AppointmentId) -> Result<Appointment, TallerError> {
        self.store
            .get(id)
            .await?
            .ok_or(TallerError::NotFound { id: id.0 })
    }

    /// Raw partial update. Never notifies, even when the status changes.
    pub async fn update(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Appointment, TallerError> {
        patch.validate()?;
        let appointment = self
            .store
            .update(id, patch)
            .await?
            .ok_or(TallerError::NotFound { id: id.0 })?;
        record_appointment("update");
        debug!(id = id.0, status = %appointment.status, "appointment updated");
        Ok(appointment)
    }

    /// Removes an appointment and returns the record as it was.
    pub async fn delete(&self, id: AppointmentId) -> Result<Appointment, TallerError> {
        let appointment = self.get(id).await?;
        if !self.store.delete(id).await? {
            return Err(TallerError::NotFound { id: id.0 });
        }
        record_appointment("delete");
        info!(id = id.0, "appointment deleted");
        Ok(appointment)
    }

    /// Every appointment, ascending by scheduled instant.
    pub async fn list_all(&self) -> Result<Vec<Appointment>, TallerError> {
        self.store.list().await
    }

    /// Appointments falling on `date`, in the store's order.
    pub async fn list_for_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, TallerError> {
        let all = self.store.list().await?;
        Ok(filter_for_date(all, date))
    }

    async fn transition(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
        kind: TemplateKind,
        operation: &'static str,
    ) -> Result<LifecycleOutcome, TallerError> {
        let appointment = self
            .store
            .update_status(id, status)
            .await?
            .ok_or(TallerError::NotFound { id: id.0 })?;
        record_appointment(operation);
        info!(id = id.0, status = %status, "appointment status changed");

        let delivery = self.notify(kind, &appointment).await;
        Ok(LifecycleOutcome {
            appointment,
            delivery,
        })
    }

    async fn notify(&self, kind: TemplateKind, appointment: &Appointment) -> DeliveryResult {
        let channel = self.notifier.channel();
        let delivery = self.notifier.send(kind, appointment).await;
        record_notification(channel, kind, &delivery);

        if delivery.success {
            debug!(
                channel,
                kind = %kind,
                id = appointment.id.0,
                message_id = delivery.message_id.as_deref().unwrap_or_default(),
                "notification sent"
            );
        } else {
            warn!(
                channel,
                kind = %kind,
                id = appointment.id.0,
                error = delivery.error.as_deref().unwrap_or_default(),
                "notification failed, appointment change kept"
            );
        }
        delivery
    }
}

/// Keeps the appointments whose calendar date equals `date`, preserving order.
///
/// Scheduled instants are shop-local wall-clock times, so the comparison is
/// on year, month and day with no timezone shift.
pub fn filter_for_date(appointments: Vec<Appointment>, date: NaiveDate) -> Vec<Appointment> {
    appointments
        .into_iter()
        .filter(|a| a.scheduled_date() == date)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use taller_storage::MemoryStore;
    use taller_test_utils::fixtures::{self, at};
    use taller_test_utils::{FailingStore, MockGateway};
    use tracing_test::traced_test;

    fn controller_with(
        store: Arc<dyn AppointmentStore>,
    ) -> (AppointmentController, Arc<MockGateway>) {
        let gateway = Arc::new(MockGateway::new());
        (AppointmentController::new(store, gateway.clone()), gateway)
    }

    fn controller() -> (AppointmentController, Arc<MockGateway>) {
        controller_with(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn create_persists_pending_and_sends_one_confirmation() {
        let (controller, gateway) = controller();
        let outcome = controller.create(fixtures::booking()).await.unwrap();

        assert_eq!(outcome.appointment.id, AppointmentId(1));
        assert_eq!(outcome.appointment.status, AppointmentStatus::Pending);
        assert!(outcome.delivery.success);

        let sent = gateway.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, TemplateKind::Confirmation);
        assert!(sent[0].text.contains("Juan"));
        assert!(!sent[0].text.contains("Perez"));
        assert!(sent[0].text.contains("Cambio de aceite"));
    }

    #[tokio::test]
    async fn create_ignores_supplied_status() {
        let (controller, _gateway) = controller();
        let mut request = fixtures::booking();
        request.status = Some(AppointmentStatus::Cancelled);

        let outcome = controller.create(request).await.unwrap();
        assert_eq!(outcome.appointment.status, AppointmentStatus::Pending);
        let stored = controller.get(outcome.appointment.id).await.unwrap();
        assert_eq!(stored.status, AppointmentStatus::Pending);
    }

    #[tokio::test]
    async fn create_rejects_missing_fields_without_touching_store() {
        let (controller, gateway) = controller();
        let mut request = fixtures::booking();
        request.customer_name = String::new();
        request.scheduled_at = None;

        let err = controller.create(request).await.unwrap_err();
        assert!(matches!(err, TallerError::Validation(_)));
        assert!(controller.list_all().await.unwrap().is_empty());
        assert_eq!(gateway.sent_count().await, 0);
    }

    #[tokio::test]
    async fn create_store_failure_sends_nothing() {
        let (controller, gateway) = controller_with(Arc::new(FailingStore));
        let err = controller.create(fixtures::booking()).await.unwrap_err();
        assert!(matches!(err, TallerError::Storage { .. }));
        assert_eq!(gateway.sent_count().await, 0);
    }

    #[traced_test]
    #[tokio::test]
    async fn create_succeeds_when_delivery_fails() {
        let gateway = Arc::new(MockGateway::failing("Error Telegram: Unauthorized"));
        let controller = AppointmentController::new(Arc::new(MemoryStore::new()), gateway.clone());

        let outcome = controller.create(fixtures::booking()).await.unwrap();
        assert!(!outcome.delivery.success);
        assert_eq!(
            outcome.delivery.error.as_deref(),
            Some("Error Telegram: Unauthorized")
        );
        assert!(controller.get(outcome.appointment.id).await.is_ok());
        assert!(logs_contain("notification failed"));
    }

    #[tokio::test]
    async fn confirm_sets_status_and_notifies() {
        let (controller, gateway) = controller_with(Arc::new(MemoryStore::with_samples()));
        let outcome = controller.confirm(AppointmentId(2)).await.unwrap();

        assert_eq!(outcome.appointment.status, AppointmentStatus::Confirmed);
        let sent = gateway.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, TemplateKind::Confirmation);
        assert_eq!(sent[0].appointment.id, AppointmentId(2));
    }

    #[tokio::test]
    async fn confirm_twice_is_idempotent() {
        let (controller, gateway) = controller_with(Arc::new(MemoryStore::with_samples()));
        let first = controller.confirm(AppointmentId(2)).await.unwrap();
        let second = controller.confirm(AppointmentId(2)).await.unwrap();

        assert_eq!(first.appointment.status, AppointmentStatus::Confirmed);
        assert_eq!(second.appointment.status, AppointmentStatus::Confirmed);
        assert_eq!(gateway.sent_count().await, 2);
    }

    #[tokio::test]
    async fn confirm_missing_id_is_not_found_and_silent() {
        let (controller, gateway) = controller();
        let err = controller.confirm(AppointmentId(99)).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(gateway.sent_count().await, 0);
    }

    #[tokio::test]
    async fn cancel_uses_cancellation_template() {
        let (controller, gateway) = controller_with(Arc::new(MemoryStore::with_samples()));
        let outcome = controller.cancel(AppointmentId(1)).await.unwrap();

        assert_eq!(outcome.appointment.status, AppointmentStatus::Cancelled);
        assert_eq!(gateway.sent().await[0].kind, TemplateKind::Cancellation);

        // Cancelled appointments may be confirmed again.
        let again = controller.confirm(AppointmentId(1)).await.unwrap();
        assert_eq!(again.appointment.status, AppointmentStatus::Confirmed);
    }

    #[tokio::test]
    async fn cancel_missing_id_is_not_found() {
        let (controller, gateway) = controller();
        assert!(controller.cancel(AppointmentId(5)).await.unwrap_err().is_not_found());
        assert_eq!(gateway.sent_count().await, 0);
    }

    #[tokio::test]
    async fn status_change_stands_when_delivery_fails() {
        let gateway = Arc::new(MockGateway::failing("Error al enviar mensaje: Error desconocido"));
        let controller =
            AppointmentController::new(Arc::new(MemoryStore::with_samples()), gateway.clone());

        let outcome = controller.cancel(AppointmentId(2)).await.unwrap();
        assert!(!outcome.delivery.success);
        let stored = controller.get(AppointmentId(2)).await.unwrap();
        assert_eq!(stored.status, AppointmentStatus::Cancelled);
    }

    #[tokio::test]
    async fn remind_keeps_status() {
        let (controller, gateway) = controller_with(Arc::new(MemoryStore::with_samples()));
        let outcome = controller.remind(AppointmentId(2)).await.unwrap();

        assert_eq!(outcome.appointment.status, AppointmentStatus::Pending);
        assert_eq!(gateway.sent().await[0].kind, TemplateKind::Reminder);
        assert!(controller.remind(AppointmentId(40)).await.unwrap_err().is_not_found());
        assert_eq!(gateway.sent_count().await, 1);
    }

    #[tokio::test]
    async fn update_never_notifies() {
        let (controller, gateway) = controller_with(Arc::new(MemoryStore::with_samples()));
        let patch = AppointmentPatch {
            note: Some("Traer llave de seguridad".into()),
            ..AppointmentPatch::status(AppointmentStatus::Confirmed)
        };

        let updated = controller.update(AppointmentId(2), patch).await.unwrap();
        assert_eq!(updated.status, AppointmentStatus::Confirmed);
        assert_eq!(updated.note.as_deref(), Some("Traer llave de seguridad"));
        assert_eq!(gateway.sent_count().await, 0);
    }

    #[tokio::test]
    async fn update_validates_and_reports_missing() {
        let (controller, _gateway) = controller_with(Arc::new(MemoryStore::with_samples()));
        let blank = AppointmentPatch {
            customer_name: Some("  ".into()),
            ..AppointmentPatch::default()
        };
        assert!(matches!(
            controller.update(AppointmentId(1), blank).await.unwrap_err(),
            TallerError::Validation(_)
        ));

        let err = controller
            .update(AppointmentId(77), AppointmentPatch::status(AppointmentStatus::Pending))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_returns_removed_record() {
        let (controller, gateway) = controller_with(Arc::new(MemoryStore::with_samples()));
        let removed = controller.delete(AppointmentId(3)).await.unwrap();
        assert_eq!(removed.id, AppointmentId(3));
        assert!(controller.get(AppointmentId(3)).await.unwrap_err().is_not_found());
        assert!(controller.delete(AppointmentId(3)).await.unwrap_err().is_not_found());
        assert_eq!(gateway.sent_count().await, 0);
    }

    #[tokio::test]
    async fn list_for_date_matches_calendar_day() {
        let (controller, _gateway) = controller_with(Arc::new(MemoryStore::with_samples()));
        let day = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();

        let ids: Vec<i64> = controller
            .list_for_date(day)
            .await
            .unwrap()
            .iter()
            .map(|a| a.id.0)
            .collect();
        assert_eq!(ids, vec![1, 2]);

        let empty = NaiveDate::from_ymd_opt(2025, 4, 12).unwrap();
        assert!(controller.list_for_date(empty).await.unwrap().is_empty());
        assert_eq!(controller.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn list_store_failure_propagates() {
        let (controller, _gateway) = controller_with(Arc::new(FailingStore));
        assert!(controller.list_all().await.is_err());
        assert!(controller.get(AppointmentId(1)).await.is_err());
    }

    #[test]
    fn late_evening_stays_on_its_day() {
        let appointments = vec![
            fixtures::appointment(1, at(2025, 4, 10, 23, 30)),
            fixtures::appointment(2, at(2025, 4, 11, 0, 15)),
        ];
        let day = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
        let kept = filter_for_date(appointments, day);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, AppointmentId(1));
    }

    fn arb_appointments() -> impl Strategy<Value = Vec<Appointment>> {
        proptest::collection::vec((1u32..=5, 0u32..24, 0u32..60), 0..20).prop_map(|slots| {
            let mut appointments: Vec<Appointment> = slots
                .into_iter()
                .enumerate()
                .map(|(i, (day, hour, minute))| {
                    fixtures::appointment(i as i64 + 1, at(2025, 4, day, hour, minute))
                })
                .collect();
            appointments.sort_by_key(|a| (a.scheduled_at, a.id));
            appointments
        })
    }

    proptest! {
        #[test]
        fn filter_is_exact_ordered_subset(appointments in arb_appointments(), day in 1u32..=6) {
            let date = NaiveDate::from_ymd_opt(2025, 4, day).unwrap();
            let kept = filter_for_date(appointments.clone(), date);

            prop_assert!(kept.iter().all(|a| a.scheduled_date() == date));
            let expected: Vec<&Appointment> = appointments
                .iter()
                .filter(|a| a.scheduled_date() == date)
                .collect();
            prop_assert_eq!(kept.iter().collect::<Vec<_>>(), expected);
        }
    }
}
