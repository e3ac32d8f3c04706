//! Best-effort notification emitter.
//!
//! Persistence failures are logged and swallowed: a lost notification must
//! never fail or roll back the operation that triggered it. One attempt, no
//! retry.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::database::models::{
    Appointment, NewNotification, NotificationType, UserPublic,
};
use crate::database::Store;

#[derive(Clone)]
pub struct Notifier {
    store: Arc<dyn Store>,
}

impl Notifier {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn emit(&self, notification: NewNotification) {
        let kind = notification.kind;
        if let Err(e) = self.store.insert_notification(notification).await {
            warn!("failed to emit {} notification: {}", kind.as_str(), e);
        }
    }

    /// Landlord is told about a fresh booking request.
    pub async fn appointment_requested(&self, appointment: &Appointment, customer: &UserPublic) {
        self.emit(NewNotification {
            recipient_id: appointment.landlord_id,
            sender_id: Some(appointment.customer_id),
            kind: NotificationType::AppointmentRequest,
            title: "New viewing request".to_string(),
            message: format!(
                "{} requested a viewing on {} at {}",
                customer.name, appointment.date, appointment.time
            ),
            related_listing_id: Some(appointment.listing_id),
            related_appointment_id: Some(appointment.id),
        })
        .await;
    }

    /// Customer is told the landlord confirmed.
    pub async fn appointment_confirmed(&self, appointment: &Appointment) {
        self.emit(NewNotification {
            recipient_id: appointment.customer_id,
            sender_id: Some(appointment.landlord_id),
            kind: NotificationType::AppointmentConfirmed,
            title: "Viewing confirmed".to_string(),
            message: format!(
                "Your viewing on {} at {} has been confirmed",
                appointment.date, appointment.time
            ),
            related_listing_id: Some(appointment.listing_id),
            related_appointment_id: Some(appointment.id),
        })
        .await;
    }

    /// The counterpart of whoever cancelled is told.
    pub async fn appointment_cancelled(&self, appointment: &Appointment, cancelled_by: Uuid) {
        let recipient_id = if cancelled_by == appointment.customer_id {
            appointment.landlord_id
        } else {
            appointment.customer_id
        };
        self.emit(NewNotification {
            recipient_id,
            sender_id: Some(cancelled_by),
            kind: NotificationType::AppointmentCancelled,
            title: "Viewing cancelled".to_string(),
            message: format!(
                "The viewing on {} at {} has been cancelled",
                appointment.date, appointment.time
            ),
            related_listing_id: Some(appointment.listing_id),
            related_appointment_id: Some(appointment.id),
        })
        .await;
    }
}
