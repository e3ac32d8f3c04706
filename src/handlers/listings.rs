use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{ListingFilter, ListingPublic, ListingUpdate, NewListing};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::services::ListingService;
use crate::AppState;

fn service(state: &AppState) -> ListingService {
    ListingService::new(state.store.clone(), state.images.clone())
}

/// GET /api/listings - filtered search, public
pub async fn search(
    State(state): State<AppState>,
    Query(filter): Query<ListingFilter>,
) -> Result<Json<Vec<ListingPublic>>, ApiError> {
    Ok(Json(service(&state).search(&filter).await?))
}

/// GET /api/listings/:id - public detail
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListingPublic>, ApiError> {
    Ok(Json(service(&state).get(id).await?))
}

/// POST /api/listings - landlord only
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(new): Json<NewListing>,
) -> Result<(StatusCode, Json<ListingPublic>), ApiError> {
    let listing = service(&state).create(&principal, new).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// PUT /api/listings/:id - owning landlord only
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ListingUpdate>,
) -> Result<Json<ListingPublic>, ApiError> {
    Ok(Json(service(&state).update(&principal, id, body).await?))
}

/// DELETE /api/listings/:id - owning landlord only
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    service(&state).delete(&principal, id).await?;
    Ok(Json(json!({ "message": "Listing deleted successfully" })))
}

/// GET /api/listings/mine - landlord's own listings
pub async fn mine(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<Vec<ListingPublic>>, ApiError> {
    Ok(Json(service(&state).mine(&principal).await?))
}

/// POST /api/listings/:id/images - multipart upload, owning landlord only
pub async fn upload_images(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let svc = service(&state);
    // Authorize before touching the filesystem
    svc.ensure_owner(&principal, id).await?;

    // Any failure past this point must delete what was already stored:
    // nothing references the files until append_images succeeds.
    let mut saved = Vec::new();
    if let Err(e) = save_image_fields(&state, &mut multipart, &mut saved).await {
        state.images.remove_all(&saved).await;
        return Err(e);
    }

    match svc.append_images(&principal, id, saved.clone()).await {
        Ok(images) => Ok(Json(json!({ "images": images }))),
        Err(e) => {
            state.images.remove_all(&saved).await;
            Err(e)
        }
    }
}

async fn save_image_fields(
    state: &AppState,
    multipart: &mut Multipart,
    saved: &mut Vec<String>,
) -> Result<(), ApiError> {
    let uploads = &crate::config::config().uploads;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("images") {
            continue;
        }
        if saved.len() >= uploads.max_files_per_request {
            return Err(ApiError::bad_request(format!(
                "At most {} images per upload",
                uploads.max_files_per_request
            )));
        }

        let file_name = field.file_name().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
        if bytes.len() > uploads.max_file_bytes {
            return Err(ApiError::bad_request("Image exceeds the size limit"));
        }

        let path = state
            .images
            .save(file_name.as_deref(), &bytes)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to store image: {}", e)))?;
        saved.push(path);
    }

    Ok(())
}

/// DELETE /api/listings/:id/images/:index - remove one image by position
pub async fn remove_image(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<Value>, ApiError> {
    let images = service(&state).remove_image(&principal, id, index).await?;
    Ok(Json(json!({ "images": images })))
}
