use axum::extract::State;
use axum::Json;

use crate::database::models::{ProfileUpdate, UserPublic};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::UserService;
use crate::AppState;

/// GET /api/users/profile - self, credential hash never selected
pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<UserPublic>, ApiError> {
    let user = UserService::new(state.store.clone()).profile(&principal).await?;
    Ok(Json(user))
}

/// PUT /api/users/profile - name and phone only
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserPublic>, ApiError> {
    let user = UserService::new(state.store.clone())
        .update_profile(&principal, update)
        .await?;
    Ok(Json(user))
}
