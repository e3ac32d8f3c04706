//! Self-profile operations. Only name and phone are caller-mutable; role and
//! email belong to the account system.

use std::sync::Arc;

use crate::database::models::{ProfileUpdate, UserPublic};
use crate::database::Store;
use crate::error::ApiError;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Re-read rather than echoing the request principal, so concurrent
    /// profile edits are reflected.
    pub async fn profile(&self, principal: &UserPublic) -> Result<UserPublic, ApiError> {
        self.store
            .find_user(principal.id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub async fn update_profile(
        &self,
        principal: &UserPublic,
        mut update: ProfileUpdate,
    ) -> Result<UserPublic, ApiError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(ApiError::bad_request("Name must not be empty"));
            }
        }
        // Empty phone clears nothing; treat as absent
        if update.phone.as_deref() == Some("") {
            update.phone = None;
        }

        Ok(self.store.update_profile(principal.id, update).await?)
    }
}
