//! Notification feed operations, always scoped to the calling recipient.

use std::sync::Arc;

use uuid::Uuid;

use crate::database::models::{Notification, NotificationFeedItem};
use crate::database::Store;
use crate::error::ApiError;

/// Display feed is capped at the most recent entries.
const FEED_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn Store>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn feed(&self, recipient_id: Uuid) -> Result<Vec<NotificationFeedItem>, ApiError> {
        Ok(self.store.notifications_for(recipient_id, FEED_LIMIT).await?)
    }

    pub async fn unread_count(&self, recipient_id: Uuid) -> Result<i64, ApiError> {
        Ok(self.store.unread_count(recipient_id).await?)
    }

    /// Recipient-scoped, so a foreign notification id reads as missing rather
    /// than leaking its existence.
    pub async fn mark_read(
        &self,
        recipient_id: Uuid,
        id: Uuid,
    ) -> Result<Notification, ApiError> {
        self.store
            .mark_notification_read(id, recipient_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Notification not found"))
    }

    pub async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64, ApiError> {
        Ok(self.store.mark_all_read(recipient_id).await?)
    }

    pub async fn delete(&self, recipient_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        if self.store.delete_notification(id, recipient_id).await? {
            Ok(())
        } else {
            Err(ApiError::not_found("Notification not found"))
        }
    }
}
