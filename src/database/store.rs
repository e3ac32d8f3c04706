use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{
    Appointment, AppointmentDetail, AppointmentStatus, Listing, ListingFilter, ListingPublic,
    ListingUpdate, NewAppointment, NewListing, NewNotification, Notification,
    NotificationFeedItem, ProfileUpdate, UserPublic,
};

/// Errors surfaced by a [`Store`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Connection or timeout failure; retryable for idempotent reads.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Repository boundary for every entity this service owns. Constructed once at
/// process start and passed explicitly; the in-memory implementation stands in
/// for Postgres in tests.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    // -- users --------------------------------------------------------------

    /// Look up a user's public record. Selects only public contact fields;
    /// the credential hash is never loaded.
    async fn find_user(&self, id: Uuid) -> Result<Option<UserPublic>, StoreError>;

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<UserPublic, StoreError>;

    // -- listings -----------------------------------------------------------

    /// Conjunctive filter search, newest first, each result carrying the
    /// owner's public contact.
    async fn search_listings(
        &self,
        filter: &ListingFilter,
    ) -> Result<Vec<ListingPublic>, StoreError>;

    async fn find_listing(&self, id: Uuid) -> Result<Option<Listing>, StoreError>;

    async fn find_listing_public(&self, id: Uuid) -> Result<Option<ListingPublic>, StoreError>;

    async fn listings_by_owner(&self, owner_id: Uuid) -> Result<Vec<ListingPublic>, StoreError>;

    async fn insert_listing(
        &self,
        owner_id: Uuid,
        new: NewListing,
    ) -> Result<ListingPublic, StoreError>;

    /// Conditional update: applies only while `owner_id` still equals
    /// `expected_owner`, closing the check-then-write race. Returns `None`
    /// when the condition no longer holds.
    async fn update_listing(
        &self,
        id: Uuid,
        expected_owner: Uuid,
        update: ListingUpdate,
    ) -> Result<Option<ListingPublic>, StoreError>;

    /// Conditional hard delete. Returns whether a row was removed.
    async fn delete_listing(&self, id: Uuid, expected_owner: Uuid) -> Result<bool, StoreError>;

    /// Replace the image list wholesale (append and remove-by-index are
    /// computed by the service). Conditional on ownership like updates.
    async fn set_listing_images(
        &self,
        id: Uuid,
        expected_owner: Uuid,
        images: Vec<String>,
    ) -> Result<Option<Vec<String>>, StoreError>;

    // -- appointments -------------------------------------------------------

    async fn insert_appointment(
        &self,
        customer_id: Uuid,
        landlord_id: Uuid,
        new: NewAppointment,
    ) -> Result<Appointment, StoreError>;

    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError>;

    async fn set_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, StoreError>;

    async fn appointment_detail(
        &self,
        id: Uuid,
    ) -> Result<Option<AppointmentDetail>, StoreError>;

    async fn appointments_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<AppointmentDetail>, StoreError>;

    async fn appointments_for_landlord(
        &self,
        landlord_id: Uuid,
    ) -> Result<Vec<AppointmentDetail>, StoreError>;

    // -- notifications ------------------------------------------------------

    async fn insert_notification(
        &self,
        new: NewNotification,
    ) -> Result<Notification, StoreError>;

    /// Most recent notifications for a recipient, newest first.
    async fn notifications_for(
        &self,
        recipient_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationFeedItem>, StoreError>;

    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64, StoreError>;

    /// Marks one notification read, scoped to the recipient. `None` when the
    /// id does not exist or belongs to someone else.
    async fn mark_notification_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<Option<Notification>, StoreError>;

    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64, StoreError>;

    async fn delete_notification(&self, id: Uuid, recipient_id: Uuid)
        -> Result<bool, StoreError>;
}
