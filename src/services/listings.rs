//! Listing CRUD, search, and image management.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::guard;
use crate::database::models::{
    Listing, ListingFilter, ListingPublic, ListingUpdate, NewListing, Role, UserPublic,
};
use crate::database::Store;
use crate::error::ApiError;
use crate::storage::ImageStore;

#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn Store>,
    images: ImageStore,
}

impl ListingService {
    pub fn new(store: Arc<dyn Store>, images: ImageStore) -> Self {
        Self { store, images }
    }

    pub async fn search(&self, filter: &ListingFilter) -> Result<Vec<ListingPublic>, ApiError> {
        validate_filter(filter)?;
        Ok(self.store.search_listings(filter).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<ListingPublic, ApiError> {
        self.store
            .find_listing_public(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Listing not found"))
    }

    pub async fn create(
        &self,
        principal: &UserPublic,
        new: NewListing,
    ) -> Result<ListingPublic, ApiError> {
        guard::require_role(principal, Role::Landlord)?;
        validate_dimensions(new.price, new.bedrooms, new.bathrooms, new.area)?;
        if new.title.trim().is_empty() {
            return Err(ApiError::bad_request("Title is required"));
        }

        Ok(self.store.insert_listing(principal.id, new).await?)
    }

    pub async fn update(
        &self,
        principal: &UserPublic,
        id: Uuid,
        update: ListingUpdate,
    ) -> Result<ListingPublic, ApiError> {
        let listing = self.owned_listing(principal, id).await?;
        validate_dimensions(
            update.price.unwrap_or(listing.price),
            update.bedrooms.unwrap_or(listing.bedrooms),
            update.bathrooms.unwrap_or(listing.bathrooms),
            update.area.unwrap_or(listing.area),
        )?;

        // Conditional on ownership: if the owner changed between the check
        // and this write, the update silently misses and we deny.
        self.store
            .update_listing(id, principal.id, update)
            .await?
            .ok_or_else(|| ApiError::forbidden("Not authorized to update this listing"))
    }

    /// Hard delete, then best-effort cleanup of the stored images.
    pub async fn delete(&self, principal: &UserPublic, id: Uuid) -> Result<(), ApiError> {
        let listing = self.owned_listing(principal, id).await?;

        if !self.store.delete_listing(id, principal.id).await? {
            return Err(ApiError::forbidden("Not authorized to delete this listing"));
        }

        self.images.remove_all(&listing.images).await;
        Ok(())
    }

    pub async fn mine(&self, principal: &UserPublic) -> Result<Vec<ListingPublic>, ApiError> {
        guard::require_role(principal, Role::Landlord)?;
        Ok(self.store.listings_by_owner(principal.id).await?)
    }

    /// Append already-saved image paths to the listing's ordered sequence.
    pub async fn append_images(
        &self,
        principal: &UserPublic,
        id: Uuid,
        new_paths: Vec<String>,
    ) -> Result<Vec<String>, ApiError> {
        if new_paths.is_empty() {
            return Err(ApiError::bad_request("No images uploaded"));
        }

        let listing = self.owned_listing(principal, id).await?;

        let mut images = listing.images;
        images.extend(new_paths);

        self.store
            .set_listing_images(id, principal.id, images)
            .await?
            .ok_or_else(|| ApiError::forbidden("Not authorized to update this listing"))
    }

    /// Remove one image by position, deleting the stored file best-effort.
    pub async fn remove_image(
        &self,
        principal: &UserPublic,
        id: Uuid,
        index: usize,
    ) -> Result<Vec<String>, ApiError> {
        let listing = self.owned_listing(principal, id).await?;

        if index >= listing.images.len() {
            return Err(ApiError::bad_request("Invalid image index"));
        }

        let mut images = listing.images;
        let removed = images.remove(index);

        let images = self
            .store
            .set_listing_images(id, principal.id, images)
            .await?
            .ok_or_else(|| ApiError::forbidden("Not authorized to update this listing"))?;

        self.images.remove(&removed).await;
        Ok(images)
    }

    /// Ownership pre-check for uploads, done before any file is written so a
    /// denied request leaves no orphan files behind.
    pub async fn ensure_owner(&self, principal: &UserPublic, id: Uuid) -> Result<(), ApiError> {
        self.owned_listing(principal, id).await.map(|_| ())
    }

    /// Resolve the listing and verify role + ownership. Lookup happens first,
    /// so missing listings are NotFound and foreign ones are Forbidden.
    async fn owned_listing(
        &self,
        principal: &UserPublic,
        id: Uuid,
    ) -> Result<Listing, ApiError> {
        guard::require_role(principal, Role::Landlord)?;

        let listing = self
            .store
            .find_listing(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Listing not found"))?;

        guard::require_ownership(principal, &[listing.owner_id])?;
        Ok(listing)
    }
}

fn validate_dimensions(price: i64, bedrooms: i32, bathrooms: i32, area: i32) -> Result<(), ApiError> {
    if price < 0 {
        return Err(ApiError::bad_request("Price must not be negative"));
    }
    if bedrooms < 0 || bathrooms < 0 || area < 0 {
        return Err(ApiError::bad_request(
            "Bedrooms, bathrooms and area must not be negative",
        ));
    }
    Ok(())
}

fn validate_filter(filter: &ListingFilter) -> Result<(), ApiError> {
    if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
        if min > max {
            return Err(ApiError::bad_request("minPrice must not exceed maxPrice"));
        }
    }
    if let (Some(min), Some(max)) = (filter.min_bedrooms, filter.max_bedrooms) {
        if min > max {
            return Err(ApiError::bad_request("minBedrooms must not exceed maxBedrooms"));
        }
    }
    Ok(())
}
