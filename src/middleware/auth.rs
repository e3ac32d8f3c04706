use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::database::models::UserPublic;
use crate::error::ApiError;
use crate::AppState;

/// Verified principal for the current request: decoded from the bearer token
/// and confirmed against the user store.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub UserPublic);

/// Why authentication did not produce a principal. Only consulted when a
/// handler actually requires one, so public routes ignore bad tokens.
#[derive(Clone, Debug)]
struct AuthRejection(String);

/// Identity-resolving middleware, applied to the whole router. Attaches a
/// [`CurrentUser`] when the bearer token verifies and its subject still
/// exists; otherwise records the failure for protected handlers to surface.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match bearer_token(request.headers()) {
        Err(reason) => {
            request.extensions_mut().insert(AuthRejection(reason));
        }
        Ok(token) => match crate::auth::decode_token(&token) {
            Err(reason) => {
                tracing::debug!("token rejected: {}", reason);
                request
                    .extensions_mut()
                    .insert(AuthRejection("Token is not valid".to_string()));
            }
            Ok(claims) => match state.store.find_user(claims.sub).await {
                // Store outage is not an auth failure
                Err(e) => return Err(e.into()),
                // Deleted account with a still-valid token
                Ok(None) => {
                    request
                        .extensions_mut()
                        .insert(AuthRejection("Token is not valid".to_string()));
                }
                Ok(Some(user)) => {
                    request.extensions_mut().insert(CurrentUser(user));
                }
            },
        },
    }

    Ok(next.run(request).await)
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }
        let reason = parts
            .extensions
            .get::<AuthRejection>()
            .map(|r| r.0.clone())
            .unwrap_or_else(|| "No token, authorization denied".to_string());
        Err(ApiError::unauthorized(reason))
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "No token, authorization denied".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        Some(_) => Err("Empty bearer token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}
