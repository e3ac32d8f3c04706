use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

/// GET /api/health - liveness probe with a store ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let version = env!("CARGO_PKG_VERSION");

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "OK",
                "timestamp": now,
                "version": version,
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "version": version,
                })),
            )
        }
    }
}

/// GET / - service banner
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "name": "Nyumba API",
        "message": "Nyumba API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
