mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn profile_round_trip() {
    let app = common::spawn().await;

    let (status, profile) = app
        .request("GET", "/api/users/profile", Some(&app.customer_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], "Carl Customer");
    assert_eq!(profile["phone"], "+254700000002");

    let (status, updated) = app
        .request(
            "PUT",
            "/api/users/profile",
            Some(&app.customer_token),
            Some(json!({"name": "Carlos Customer", "phone": "+254711111111"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Carlos Customer");
    assert_eq!(updated["phone"], "+254711111111");

    // The change is visible on the next read
    let (_, again) = app
        .request("GET", "/api/users/profile", Some(&app.customer_token), None)
        .await;
    assert_eq!(again["name"], "Carlos Customer");
}

#[tokio::test]
async fn partial_update_leaves_other_fields_alone() {
    let app = common::spawn().await;

    let (_, updated) = app
        .request(
            "PUT",
            "/api/users/profile",
            Some(&app.customer_token),
            Some(json!({"phone": "+254722222222"})),
        )
        .await;
    assert_eq!(updated["name"], "Carl Customer");
    assert_eq!(updated["phone"], "+254722222222");
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let app = common::spawn().await;

    let (status, _) = app
        .request(
            "PUT",
            "/api/users/profile",
            Some(&app.customer_token),
            Some(json!({"name": "   "})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn role_and_email_are_immutable_through_the_profile() {
    let app = common::spawn().await;

    // Unknown fields are ignored rather than applied
    let (status, updated) = app
        .request(
            "PUT",
            "/api/users/profile",
            Some(&app.customer_token),
            Some(json!({"role": "landlord", "email": "new@example.com", "name": "Carl Customer"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "customer");
    assert_eq!(updated["email"], "carl@example.com");
}
