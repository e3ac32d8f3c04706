use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::listing::ListingSummary;
use super::user::UserPublic;

/// Booking status. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled)
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status: {}", other)),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appointment row. `landlord_id` is copied from the listing's owner at
/// booking time and never re-derived afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub customer_id: Uuid,
    pub landlord_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Which side of the appointment a principal is on, if any.
    pub fn party_of(&self, principal_id: Uuid) -> Option<Party> {
        if principal_id == self.customer_id {
            Some(Party::Customer)
        } else if principal_id == self.landlord_id {
            Some(Party::Landlord)
        } else {
            None
        }
    }
}

/// The two sides of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Customer,
    Landlord,
}

/// Fully denormalized appointment returned by every lifecycle operation.
/// The listing summary is absent when the listing was hard-deleted after
/// booking; the appointment itself is never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetail {
    pub id: Uuid,
    pub listing: Option<ListingSummary>,
    pub customer: UserPublic,
    pub landlord: UserPublic,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub listing_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub message: String,
}
