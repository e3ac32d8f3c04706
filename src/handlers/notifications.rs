use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Notification, NotificationFeedItem};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::NotificationService;
use crate::AppState;

fn service(state: &AppState) -> NotificationService {
    NotificationService::new(state.store.clone())
}

/// GET /api/notifications - recent feed, newest first
pub async fn feed(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<Vec<NotificationFeedItem>>, ApiError> {
    Ok(Json(service(&state).feed(principal.id).await?))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let count = service(&state).unread_count(principal.id).await?;
    Ok(Json(json!({ "count": count })))
}

/// PUT /api/notifications/:id/read - recipient only
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    Ok(Json(service(&state).mark_read(principal.id, id).await?))
}

/// PUT /api/notifications/mark-all-read
pub async fn mark_all_read(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    service(&state).mark_all_read(principal.id).await?;
    Ok(Json(json!({ "message": "All notifications marked as read" })))
}

/// DELETE /api/notifications/:id - recipient only
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    service(&state).delete(principal.id, id).await?;
    Ok(Json(json!({ "message": "Notification deleted" })))
}
