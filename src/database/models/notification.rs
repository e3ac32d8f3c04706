use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Closed set of notification kinds. Call sites pick from this enum, so an
/// unknown type is unrepresentable by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum NotificationType {
    AppointmentRequest,
    AppointmentConfirmed,
    AppointmentCancelled,
    NewMessage,
    PropertyViewed,
    PropertyLiked,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::AppointmentRequest => "appointment_request",
            NotificationType::AppointmentConfirmed => "appointment_confirmed",
            NotificationType::AppointmentCancelled => "appointment_cancelled",
            NotificationType::NewMessage => "new_message",
            NotificationType::PropertyViewed => "property_viewed",
            NotificationType::PropertyLiked => "property_liked",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub related_listing_id: Option<Uuid>,
    pub related_appointment_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Feed projection: the notification plus display fields joined from the
/// sender and the related listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeedItem {
    #[serde(flatten)]
    pub notification: Notification,
    pub sender_name: Option<String>,
    pub listing_title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub related_listing_id: Option<Uuid>,
    pub related_appointment_id: Option<Uuid>,
}
