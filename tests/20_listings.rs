mod common;

use axum::http::StatusCode;
use common::id_of;
use serde_json::json;

#[tokio::test]
async fn customer_cannot_create_listing() {
    let app = common::spawn().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/listings",
            Some(&app.customer_token),
            Some(json!({
                "title": "Nope",
                "description": "x",
                "location": {"address": "1 Road", "city": "Nakuru", "state": "Nakuru County"},
                "price": 1000,
                "bedrooms": 1,
                "bathrooms": 1,
                "area": 30,
                "propertyType": "studio"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn created_listing_embeds_owner_profile() {
    let app = common::spawn().await;
    let listing = app.create_listing("Garden Flat", 45000, 2, "Nairobi").await;

    assert_eq!(listing["landlord"]["name"], "Leah Landlord");
    assert_eq!(listing["landlord"]["role"], "landlord");
    assert!(listing["landlord"].get("password").is_none());
    assert_eq!(listing["location"]["city"], "Nairobi");
    assert_eq!(listing["available"], true);

    let (status, fetched) = app
        .request("GET", &format!("/api/listings/{}", id_of(&listing)), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Garden Flat");
}

#[tokio::test]
async fn filters_are_conjunctive() {
    let app = common::spawn().await;
    app.create_listing("Cheap Nairobi Studio", 15000, 1, "Nairobi").await;
    app.create_listing("Pricey Nairobi Flat", 90000, 3, "Nairobi").await;
    app.create_listing("Cheap Mombasa Room", 12000, 1, "Mombasa").await;

    let (status, body) = app
        .request("GET", "/api/listings?city=nairobi&maxPrice=20000", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Cheap Nairobi Studio");
}

#[tokio::test]
async fn search_matches_title_and_description() {
    let app = common::spawn().await;
    app.create_listing("Riverside Loft", 60000, 2, "Nairobi").await;
    app.create_listing("Town Bedsitter", 18000, 1, "Kisumu").await;

    let (status, body) = app.request("GET", "/api/listings?search=LOFT", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn inverted_price_range_is_rejected() {
    let app = common::spawn().await;

    let (status, _) = app
        .request("GET", "/api/listings?minPrice=5000&maxPrice=100", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_property_type_filter_is_rejected() {
    let app = common::spawn().await;

    let (status, _) = app
        .request("GET", "/api/listings?propertyType=castle", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_owner_can_update_listing() {
    let app = common::spawn().await;
    let listing = app.create_listing("Garden Flat", 45000, 2, "Nairobi").await;
    let id = id_of(&listing);

    // Another landlord, not the owner
    let store = app.store.clone();
    let other = nyumba_api::database::models::UserPublic {
        id: uuid::Uuid::new_v4(),
        name: "Olive Other".into(),
        email: "olive@example.com".into(),
        phone: None,
        role: nyumba_api::database::models::Role::Landlord,
    };
    store.add_user(other.clone()).await;
    let other_token = nyumba_api::auth::issue_token(other.id, other.role).unwrap();

    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/listings/{}", id),
            Some(&other_token),
            Some(json!({"price": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .request(
            "PUT",
            &format!("/api/listings/{}", id),
            Some(&app.landlord_token),
            Some(json!({"price": 47000, "available": false})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 47000);
    assert_eq!(updated["available"], false);
    // Untouched fields survive a partial update
    assert_eq!(updated["bedrooms"], 2);
}

#[tokio::test]
async fn update_of_missing_listing_is_not_found() {
    let app = common::spawn().await;

    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/listings/{}", uuid::Uuid::new_v4()),
            Some(&app.landlord_token),
            Some(json!({"price": 1000})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_listing_from_search() {
    let app = common::spawn().await;
    let listing = app.create_listing("Garden Flat", 45000, 2, "Nairobi").await;
    let id = id_of(&listing);

    let (status, body) = app
        .request(
            "DELETE",
            &format!("/api/listings/{}", id),
            Some(&app.landlord_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Listing deleted successfully");

    let (status, _) = app
        .request("GET", &format!("/api/listings/{}", id), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, all) = app.request("GET", "/api/listings", None, None).await;
    assert_eq!(all.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn mine_lists_only_own_properties() {
    let app = common::spawn().await;
    app.create_listing("Garden Flat", 45000, 2, "Nairobi").await;
    app.create_listing("Roof Studio", 30000, 1, "Nairobi").await;

    let (status, body) = app
        .request("GET", "/api/listings/mine", Some(&app.landlord_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = app
        .request("GET", "/api/listings/mine", Some(&app.customer_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unavailable_listings_are_hidden_by_default() {
    let app = common::spawn().await;
    let listing = app.create_listing("Garden Flat", 45000, 2, "Nairobi").await;
    app.request(
        "PUT",
        &format!("/api/listings/{}", id_of(&listing)),
        Some(&app.landlord_token),
        Some(json!({"available": false})),
    )
    .await;

    let (_, default_view) = app.request("GET", "/api/listings", None, None).await;
    assert_eq!(default_view.as_array().unwrap().len(), 0);

    let (_, explicit) = app
        .request("GET", "/api/listings?available=false", None, None)
        .await;
    assert_eq!(explicit.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn image_upload_round_trip() {
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    let app = common::spawn().await;
    let listing = app.create_listing("Garden Flat", 45000, 2, "Nairobi").await;

    let boundary = "nyumba-test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"images\"; filename=\"front.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         not-really-a-png\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/listings/{}/images", id_of(&listing)))
        .header(header::AUTHORIZATION, format!("Bearer {}", app.landlord_token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let images = value["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    let public_path = images[0].as_str().unwrap();
    assert!(public_path.starts_with("/uploads/"));
    assert!(public_path.ends_with(".png"));

    // The file landed in the upload directory
    let on_disk = app
        .upload_dir
        .path()
        .join(public_path.strip_prefix("/uploads/").unwrap());
    assert!(on_disk.exists());

    // And the listing now carries the path
    let (_, fetched) = app
        .request("GET", &format!("/api/listings/{}", id_of(&listing)), None, None)
        .await;
    assert_eq!(fetched["images"][0], *public_path);
}

#[tokio::test]
async fn upload_by_non_owner_stores_nothing() {
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    let app = common::spawn().await;
    let listing = app.create_listing("Garden Flat", 45000, 2, "Nairobi").await;

    let boundary = "nyumba-test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"images\"; filename=\"x.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         bytes\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/listings/{}/images", id_of(&listing)))
        .header(header::AUTHORIZATION, format!("Bearer {}", app.customer_token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Denied before any file was written
    let entries = std::fs::read_dir(app.upload_dir.path()).unwrap().count();
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn rejected_upload_leaves_no_files_behind() {
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    let app = common::spawn().await;
    let listing = app.create_listing("Garden Flat", 45000, 2, "Nairobi").await;

    // One part over the per-request limit of 10
    let boundary = "nyumba-test-boundary";
    let mut body = String::new();
    for i in 0..11 {
        body.push_str(&format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"images\"; filename=\"photo{i}.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             bytes-{i}\r\n",
            b = boundary,
            i = i
        ));
    }
    body.push_str(&format!("--{}--\r\n", boundary));

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/listings/{}/images", id_of(&listing)))
        .header(header::AUTHORIZATION, format!("Bearer {}", app.landlord_token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The files stored before the limit was hit were cleaned up again
    let entries = std::fs::read_dir(app.upload_dir.path()).unwrap().count();
    assert_eq!(entries, 0);

    // And the listing never picked up any of them
    let (_, fetched) = app
        .request("GET", &format!("/api/listings/{}", id_of(&listing)), None, None)
        .await;
    assert_eq!(fetched["images"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn image_removal_checks_bounds() {
    let app = common::spawn().await;
    let listing = app.create_listing("Garden Flat", 45000, 2, "Nairobi").await;

    let (status, body) = app
        .request(
            "DELETE",
            &format!("/api/listings/{}/images/0", id_of(&listing)),
            Some(&app.landlord_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid image index");
}
