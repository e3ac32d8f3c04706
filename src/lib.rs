pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod storage;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::database::Store;
use crate::storage::ImageStore;

/// Shared handler state: the injected store plus image storage. Built once at
/// startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub images: ImageStore,
}

pub fn app(state: AppState) -> Router {
    use handlers::{appointments, health, listings, notifications, users};

    let uploads = &config::config().uploads;
    let body_limit = uploads.max_file_bytes * uploads.max_files_per_request + 1024 * 1024;

    Router::new()
        // Public
        .route("/", get(health::root))
        .route("/api/health", get(health::health))
        // Listings
        .route("/api/listings", get(listings::search).post(listings::create))
        .route("/api/listings/mine", get(listings::mine))
        .route(
            "/api/listings/:id",
            get(listings::get_one)
                .put(listings::update)
                .delete(listings::remove),
        )
        .route("/api/listings/:id/images", post(listings::upload_images))
        .route("/api/listings/:id/images/:index", delete(listings::remove_image))
        // Appointments
        .route("/api/appointments", post(appointments::create))
        .route("/api/appointments/mine", get(appointments::mine))
        .route("/api/appointments/:id", get(appointments::get_one))
        .route("/api/appointments/:id/status", put(appointments::set_status))
        .route("/api/appointments/:id/cancel", put(appointments::cancel))
        // Notifications
        .route("/api/notifications", get(notifications::feed))
        .route("/api/notifications/unread-count", get(notifications::unread_count))
        .route("/api/notifications/mark-all-read", put(notifications::mark_all_read))
        .route(
            "/api/notifications/:id",
            delete(notifications::remove),
        )
        .route("/api/notifications/:id/read", put(notifications::mark_read))
        // Users
        .route("/api/users/profile", get(users::profile).put(users::update_profile))
        // Uploaded images
        .nest_service("/uploads", ServeDir::new(state.images.dir()))
        .fallback(not_found)
        // Global middleware
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::authenticate,
        ))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn not_found() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
}
