//! In-memory [`Store`] used by the integration tests in place of Postgres.
//! Semantics mirror the SQL implementation: conjunctive filters,
//! case-insensitive substring matching, conditional owner updates.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{
    Appointment, AppointmentDetail, AppointmentStatus, Listing, ListingFilter, ListingPublic,
    ListingSummary, ListingUpdate, NewAppointment, NewListing, NewNotification, Notification,
    NotificationFeedItem, ProfileUpdate, UserPublic,
};
use super::store::{Store, StoreError};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserPublic>,
    listings: HashMap<Uuid, Listing>,
    appointments: HashMap<Uuid, Appointment>,
    notifications: HashMap<Uuid, Notification>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user record (tests only have public fields to begin with).
    pub async fn add_user(&self, user: UserPublic) {
        self.tables.write().await.users.insert(user.id, user);
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_filter(listing: &Listing, filter: &ListingFilter) -> bool {
    if listing.available != filter.available.unwrap_or(true) {
        return false;
    }
    if let Some(city) = &filter.city {
        if !contains_ci(&listing.city, city) {
            return false;
        }
    }
    if let Some(state) = &filter.state {
        if !contains_ci(&listing.state, state) {
            return false;
        }
    }
    if let Some(location) = &filter.location {
        if !(contains_ci(&listing.address, location)
            || contains_ci(&listing.city, location)
            || contains_ci(&listing.state, location))
        {
            return false;
        }
    }
    if let Some(min_price) = filter.min_price {
        if listing.price < min_price {
            return false;
        }
    }
    if let Some(max_price) = filter.max_price {
        if listing.price > max_price {
            return false;
        }
    }
    if let Some(min_bedrooms) = filter.min_bedrooms {
        if listing.bedrooms < min_bedrooms {
            return false;
        }
    }
    if let Some(max_bedrooms) = filter.max_bedrooms {
        if listing.bedrooms > max_bedrooms {
            return false;
        }
    }
    if let Some(property_type) = filter.property_type {
        if listing.property_type != property_type {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        if !(contains_ci(&listing.title, search)
            || contains_ci(&listing.description, search)
            || contains_ci(&listing.address, search)
            || contains_ci(&listing.city, search))
        {
            return false;
        }
    }
    true
}

impl Tables {
    fn owner_of(&self, listing: &Listing) -> Result<UserPublic, StoreError> {
        self.users
            .get(&listing.owner_id)
            .cloned()
            .ok_or_else(|| StoreError::Query(format!("listing owner {} missing", listing.owner_id)))
    }

    fn detail_of(&self, appointment: &Appointment) -> Result<AppointmentDetail, StoreError> {
        let customer = self
            .users
            .get(&appointment.customer_id)
            .cloned()
            .ok_or_else(|| StoreError::Query("appointment customer missing".to_string()))?;
        let landlord = self
            .users
            .get(&appointment.landlord_id)
            .cloned()
            .ok_or_else(|| StoreError::Query("appointment landlord missing".to_string()))?;
        let listing = self
            .listings
            .get(&appointment.listing_id)
            .map(ListingSummary::from);

        Ok(AppointmentDetail {
            id: appointment.id,
            listing,
            customer,
            landlord,
            date: appointment.date,
            time: appointment.time.clone(),
            status: appointment.status,
            message: appointment.message.clone(),
            created_at: appointment.created_at,
        })
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserPublic>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<UserPublic, StoreError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("User not found".to_string()))?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(phone) = update.phone {
            user.phone = Some(phone);
        }
        Ok(user.clone())
    }

    async fn search_listings(
        &self,
        filter: &ListingFilter,
    ) -> Result<Vec<ListingPublic>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Listing> = tables
            .listings
            .values()
            .filter(|l| matches_filter(l, filter))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        rows.into_iter()
            .map(|l| Ok(ListingPublic::from_row(l.clone(), tables.owner_of(l)?)))
            .collect()
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<Listing>, StoreError> {
        Ok(self.tables.read().await.listings.get(&id).cloned())
    }

    async fn find_listing_public(&self, id: Uuid) -> Result<Option<ListingPublic>, StoreError> {
        let tables = self.tables.read().await;
        match tables.listings.get(&id) {
            Some(l) => Ok(Some(ListingPublic::from_row(l.clone(), tables.owner_of(l)?))),
            None => Ok(None),
        }
    }

    async fn listings_by_owner(&self, owner_id: Uuid) -> Result<Vec<ListingPublic>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Listing> = tables
            .listings
            .values()
            .filter(|l| l.owner_id == owner_id)
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        rows.into_iter()
            .map(|l| Ok(ListingPublic::from_row(l.clone(), tables.owner_of(l)?)))
            .collect()
    }

    async fn insert_listing(
        &self,
        owner_id: Uuid,
        new: NewListing,
    ) -> Result<ListingPublic, StoreError> {
        let now = Utc::now();
        let listing = Listing {
            id: Uuid::new_v4(),
            owner_id,
            title: new.title,
            description: new.description,
            address: new.location.address,
            city: new.location.city,
            state: new.location.state,
            zip_code: new.location.zip_code,
            price: new.price,
            bedrooms: new.bedrooms,
            bathrooms: new.bathrooms,
            area: new.area,
            property_type: new.property_type,
            amenities: new.amenities,
            images: Vec::new(),
            available: new.available,
            created_at: now,
            updated_at: now,
        };

        let mut tables = self.tables.write().await;
        let owner = tables.owner_of(&listing)?;
        tables.listings.insert(listing.id, listing.clone());
        Ok(ListingPublic::from_row(listing, owner))
    }

    async fn update_listing(
        &self,
        id: Uuid,
        expected_owner: Uuid,
        update: ListingUpdate,
    ) -> Result<Option<ListingPublic>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(listing) = tables.listings.get_mut(&id) else {
            return Ok(None);
        };
        if listing.owner_id != expected_owner {
            return Ok(None);
        }

        if let Some(title) = update.title {
            listing.title = title;
        }
        if let Some(description) = update.description {
            listing.description = description;
        }
        if let Some(location) = update.location {
            listing.address = location.address;
            listing.city = location.city;
            listing.state = location.state;
            if location.zip_code.is_some() {
                listing.zip_code = location.zip_code;
            }
        }
        if let Some(price) = update.price {
            listing.price = price;
        }
        if let Some(bedrooms) = update.bedrooms {
            listing.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = update.bathrooms {
            listing.bathrooms = bathrooms;
        }
        if let Some(area) = update.area {
            listing.area = area;
        }
        if let Some(property_type) = update.property_type {
            listing.property_type = property_type;
        }
        if let Some(amenities) = update.amenities {
            listing.amenities = amenities;
        }
        if let Some(available) = update.available {
            listing.available = available;
        }
        listing.updated_at = Utc::now();

        let listing = listing.clone();
        let owner = tables.owner_of(&listing)?;
        Ok(Some(ListingPublic::from_row(listing, owner)))
    }

    async fn delete_listing(&self, id: Uuid, expected_owner: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.listings.get(&id) {
            Some(l) if l.owner_id == expected_owner => {
                tables.listings.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_listing_images(
        &self,
        id: Uuid,
        expected_owner: Uuid,
        images: Vec<String>,
    ) -> Result<Option<Vec<String>>, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.listings.get_mut(&id) {
            Some(l) if l.owner_id == expected_owner => {
                l.images = images.clone();
                l.updated_at = Utc::now();
                Ok(Some(images))
            }
            _ => Ok(None),
        }
    }

    async fn insert_appointment(
        &self,
        customer_id: Uuid,
        landlord_id: Uuid,
        new: NewAppointment,
    ) -> Result<Appointment, StoreError> {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            listing_id: new.listing_id,
            customer_id,
            landlord_id,
            date: new.date,
            time: new.time,
            status: AppointmentStatus::Pending,
            message: new.message,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .appointments
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        Ok(self.tables.read().await.appointments.get(&id).cloned())
    }

    async fn set_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, StoreError> {
        let mut tables = self.tables.write().await;
        let appointment = tables
            .appointments
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("Appointment not found".to_string()))?;
        appointment.status = status;
        Ok(appointment.clone())
    }

    async fn appointment_detail(
        &self,
        id: Uuid,
    ) -> Result<Option<AppointmentDetail>, StoreError> {
        let tables = self.tables.read().await;
        match tables.appointments.get(&id) {
            Some(a) => Ok(Some(tables.detail_of(a)?)),
            None => Ok(None),
        }
    }

    async fn appointments_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<AppointmentDetail>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Appointment> = tables
            .appointments
            .values()
            .filter(|a| a.customer_id == customer_id)
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows.into_iter().map(|a| tables.detail_of(a)).collect()
    }

    async fn appointments_for_landlord(
        &self,
        landlord_id: Uuid,
    ) -> Result<Vec<AppointmentDetail>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Appointment> = tables
            .appointments
            .values()
            .filter(|a| a.landlord_id == landlord_id)
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows.into_iter().map(|a| tables.detail_of(a)).collect()
    }

    async fn insert_notification(
        &self,
        new: NewNotification,
    ) -> Result<Notification, StoreError> {
        let notification = Notification {
            id: Uuid::new_v4(),
            recipient_id: new.recipient_id,
            sender_id: new.sender_id,
            kind: new.kind,
            title: new.title,
            message: new.message,
            related_listing_id: new.related_listing_id,
            related_appointment_id: new.related_appointment_id,
            read: false,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn notifications_for(
        &self,
        recipient_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationFeedItem>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Notification> = tables
            .notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id)
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit.max(0) as usize);

        Ok(rows
            .into_iter()
            .map(|n| NotificationFeedItem {
                notification: n.clone(),
                sender_name: n
                    .sender_id
                    .and_then(|id| tables.users.get(&id))
                    .map(|u| u.name.clone()),
                listing_title: n
                    .related_listing_id
                    .and_then(|id| tables.listings.get(&id))
                    .map(|l| l.title.clone()),
            })
            .collect())
    }

    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id && !n.read)
            .count() as i64)
    }

    async fn mark_notification_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<Option<Notification>, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.notifications.get_mut(&id) {
            Some(n) if n.recipient_id == recipient_id => {
                n.read = true;
                Ok(Some(n.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let mut updated = 0u64;
        for n in tables.notifications.values_mut() {
            if n.recipient_id == recipient_id && !n.read {
                n.read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_notification(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.notifications.get(&id) {
            Some(n) if n.recipient_id == recipient_id => {
                tables.notifications.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
