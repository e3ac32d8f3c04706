//! Appointment booking and lifecycle operations.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::guard;
use crate::database::models::{
    Appointment, AppointmentDetail, AppointmentStatus, NewAppointment, Party, Role, UserPublic,
};
use crate::database::Store;
use crate::error::ApiError;

use super::lifecycle::{self, Transition};
use super::notify::Notifier;

#[derive(Clone)]
pub struct AppointmentService {
    store: Arc<dyn Store>,
    notifier: Notifier,
}

impl AppointmentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let notifier = Notifier::new(store.clone());
        Self { store, notifier }
    }

    /// Book a viewing. Customers only; the listing must exist, and the
    /// landlord side is frozen from the listing's owner at this moment.
    pub async fn book(
        &self,
        principal: &UserPublic,
        new: NewAppointment,
    ) -> Result<AppointmentDetail, ApiError> {
        guard::require_role(principal, Role::Customer)?;

        let listing = self
            .store
            .find_listing(new.listing_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Listing not found"))?;

        let appointment = self
            .store
            .insert_appointment(principal.id, listing.owner_id, new)
            .await?;

        self.notifier.appointment_requested(&appointment, principal).await;
        self.detail_of(appointment.id).await
    }

    /// Landlord-driven status change (confirm, or cancel via status). The
    /// raw status is parsed only after the ownership check, so a non-landlord
    /// caller sees Forbidden no matter what they sent.
    pub async fn set_status(
        &self,
        principal: &UserPublic,
        id: Uuid,
        requested: &str,
    ) -> Result<AppointmentDetail, ApiError> {
        let appointment = self.find(id).await?;
        guard::require_ownership(principal, &[appointment.landlord_id])?;

        let requested: AppointmentStatus = requested
            .parse()
            .map_err(|_| ApiError::bad_request(format!("Invalid status: {}", requested)))?;

        self.apply(appointment, requested, Party::Landlord, principal.id)
            .await
    }

    /// Cancellation by either party. Re-cancelling is a no-op.
    pub async fn cancel(
        &self,
        principal: &UserPublic,
        id: Uuid,
    ) -> Result<AppointmentDetail, ApiError> {
        let appointment = self.find(id).await?;
        guard::require_ownership(
            principal,
            &[appointment.customer_id, appointment.landlord_id],
        )?;

        // Party is known to exist after the ownership check
        let party = appointment
            .party_of(principal.id)
            .ok_or_else(|| ApiError::forbidden("Not authorized"))?;

        self.apply(appointment, AppointmentStatus::Cancelled, party, principal.id)
            .await
    }

    /// Full detail, visible to either party.
    pub async fn get(
        &self,
        principal: &UserPublic,
        id: Uuid,
    ) -> Result<AppointmentDetail, ApiError> {
        let appointment = self.find(id).await?;
        guard::require_ownership(
            principal,
            &[appointment.customer_id, appointment.landlord_id],
        )?;
        self.detail_of(id).await
    }

    /// Role-dependent view: customers see their bookings, landlords the
    /// bookings they received.
    pub async fn mine(&self, principal: &UserPublic) -> Result<Vec<AppointmentDetail>, ApiError> {
        let details = match principal.role {
            Role::Customer => self.store.appointments_for_customer(principal.id).await?,
            Role::Landlord => self.store.appointments_for_landlord(principal.id).await?,
        };
        Ok(details)
    }

    async fn apply(
        &self,
        appointment: Appointment,
        requested: AppointmentStatus,
        actor: Party,
        actor_id: Uuid,
    ) -> Result<AppointmentDetail, ApiError> {
        match lifecycle::plan(appointment.status, requested, actor)? {
            Transition::Noop => self.detail_of(appointment.id).await,
            Transition::Apply(status) => {
                let updated = self.store.set_appointment_status(appointment.id, status).await?;

                match status {
                    AppointmentStatus::Confirmed => {
                        self.notifier.appointment_confirmed(&updated).await
                    }
                    AppointmentStatus::Cancelled => {
                        self.notifier.appointment_cancelled(&updated, actor_id).await
                    }
                    AppointmentStatus::Pending => {}
                }

                self.detail_of(updated.id).await
            }
        }
    }

    async fn find(&self, id: Uuid) -> Result<Appointment, ApiError> {
        self.store
            .find_appointment(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Appointment not found"))
    }

    async fn detail_of(&self, id: Uuid) -> Result<AppointmentDetail, ApiError> {
        self.store
            .appointment_detail(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Appointment not found"))
    }
}
