use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{AppointmentDetail, NewAppointment};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::AppointmentService;
use crate::AppState;

fn service(state: &AppState) -> AppointmentService {
    AppointmentService::new(state.store.clone())
}

/// POST /api/appointments - customer books a viewing
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(new): Json<NewAppointment>,
) -> Result<(StatusCode, Json<AppointmentDetail>), ApiError> {
    let detail = service(&state).book(&principal, new).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/appointments/mine - bookings made (customer) or received (landlord)
pub async fn mine(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<Vec<AppointmentDetail>>, ApiError> {
    Ok(Json(service(&state).mine(&principal).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    // Raw string: parsed after the ownership check so non-landlords always
    // get Forbidden, whatever they sent
    pub status: String,
}

/// PUT /api/appointments/:id/status - landlord decides
pub async fn set_status(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> Result<Json<AppointmentDetail>, ApiError> {
    Ok(Json(service(&state).set_status(&principal, id, &body.status).await?))
}

/// PUT /api/appointments/:id/cancel - either party, idempotent
pub async fn cancel(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentDetail>, ApiError> {
    Ok(Json(service(&state).cancel(&principal, id).await?))
}

/// GET /api/appointments/:id - detail, either party
pub async fn get_one(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentDetail>, ApiError> {
    Ok(Json(service(&state).get(&principal, id).await?))
}
