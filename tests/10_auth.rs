mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_endpoint_responds() {
    let app = common::spawn().await;

    let (status, body) = app.request("GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_route_returns_not_found_envelope() {
    let app = common::spawn().await;

    let (status, body) = app.request("GET", "/api/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let app = common::spawn().await;

    let (status, body) = app.request("GET", "/api/users/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token, authorization denied");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = common::spawn().await;

    let (status, body) = app
        .request("GET", "/api/users/profile", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token is not valid");
}

#[tokio::test]
async fn token_for_deleted_account_is_rejected() {
    let app = common::spawn().await;

    // Well-formed token whose subject no longer exists in the store
    let ghost = nyumba_api::auth::issue_token(
        uuid::Uuid::new_v4(),
        nyumba_api::database::models::Role::Customer,
    )
    .unwrap();

    let (status, body) = app
        .request("GET", "/api/users/profile", Some(&ghost), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token is not valid");
}

#[tokio::test]
async fn principal_never_includes_credentials() {
    let app = common::spawn().await;

    let (status, body) = app
        .request("GET", "/api/users/profile", Some(&app.customer_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "carl@example.com");
    assert_eq!(body["role"], "customer");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn public_listing_search_works_without_token() {
    let app = common::spawn().await;
    app.create_listing("Garden Flat", 45000, 2, "Nairobi").await;

    let (status, body) = app.request("GET", "/api/listings", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn writes_with_bad_tokens_are_not_applied() {
    let app = common::spawn().await;

    // A write behind auth must not go through when the token is bad.
    let (status, _) = app
        .request(
            "PUT",
            "/api/users/profile",
            Some("bad-token"),
            Some(json!({"name": "Intruder"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, profile) = app
        .request("GET", "/api/users/profile", Some(&app.customer_token), None)
        .await;
    assert_eq!(profile["name"], "Carl Customer");
}
