mod common;

use axum::http::StatusCode;
use common::id_of;

async fn seed_two_notifications(app: &common::TestApp) {
    let a = app.create_listing("Garden Flat", 45000, 2, "Nairobi").await;
    let b = app.create_listing("Roof Studio", 30000, 1, "Nairobi").await;
    app.book(&id_of(&a), "2026-09-12").await;
    app.book(&id_of(&b), "2026-09-13").await;
}

#[tokio::test]
async fn feed_is_scoped_to_the_recipient() {
    let app = common::spawn().await;
    seed_two_notifications(&app).await;

    let (status, feed) = app
        .request("GET", "/api/notifications", Some(&app.landlord_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed.as_array().unwrap().len(), 2);
    assert_eq!(feed[0]["senderName"], "Carl Customer");

    // The customer triggered them but does not receive them
    let (_, other) = app
        .request("GET", "/api/notifications", Some(&app.customer_token), None)
        .await;
    assert_eq!(other.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unread_count_tracks_reads() {
    let app = common::spawn().await;
    seed_two_notifications(&app).await;

    let (_, count) = app
        .request("GET", "/api/notifications/unread-count", Some(&app.landlord_token), None)
        .await;
    assert_eq!(count["count"], 2);

    let (_, feed) = app
        .request("GET", "/api/notifications", Some(&app.landlord_token), None)
        .await;
    let first_id = feed[0]["id"].as_str().unwrap().to_string();

    let (status, marked) = app
        .request(
            "PUT",
            &format!("/api/notifications/{}/read", first_id),
            Some(&app.landlord_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marked["read"], true);

    let (_, count) = app
        .request("GET", "/api/notifications/unread-count", Some(&app.landlord_token), None)
        .await;
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn mark_all_read_resets_the_count() {
    let app = common::spawn().await;
    seed_two_notifications(&app).await;

    let (status, body) = app
        .request("PUT", "/api/notifications/mark-all-read", Some(&app.landlord_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All notifications marked as read");

    let (_, count) = app
        .request("GET", "/api/notifications/unread-count", Some(&app.landlord_token), None)
        .await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn notifications_of_other_users_are_invisible() {
    let app = common::spawn().await;
    seed_two_notifications(&app).await;

    let (_, feed) = app
        .request("GET", "/api/notifications", Some(&app.landlord_token), None)
        .await;
    let foreign_id = feed[0]["id"].as_str().unwrap().to_string();

    // Acting on someone else's notification reads as if it does not exist
    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/notifications/{}/read", foreign_id),
            Some(&app.customer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            "DELETE",
            &format!("/api/notifications/{}", foreign_id),
            Some(&app.customer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_from_feed_and_count() {
    let app = common::spawn().await;
    seed_two_notifications(&app).await;

    let (_, feed) = app
        .request("GET", "/api/notifications", Some(&app.landlord_token), None)
        .await;
    let target = feed[0]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(
            "DELETE",
            &format!("/api/notifications/{}", target),
            Some(&app.landlord_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Notification deleted");

    let (_, feed) = app
        .request("GET", "/api/notifications", Some(&app.landlord_token), None)
        .await;
    assert_eq!(feed.as_array().unwrap().len(), 1);
    let (_, count) = app
        .request("GET", "/api/notifications/unread-count", Some(&app.landlord_token), None)
        .await;
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn feed_items_carry_listing_context() {
    let app = common::spawn().await;
    let listing = app.create_listing("Garden Flat", 45000, 2, "Nairobi").await;
    app.book(&id_of(&listing), "2026-09-12").await;

    let (_, feed) = app
        .request("GET", "/api/notifications", Some(&app.landlord_token), None)
        .await;
    assert_eq!(feed[0]["listingTitle"], "Garden Flat");
    assert_eq!(feed[0]["read"], false);
    assert!(feed[0]["message"].as_str().unwrap().contains("Carl Customer"));
}

#[tokio::test]
async fn mark_read_of_unknown_id_is_not_found() {
    let app = common::spawn().await;

    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/notifications/{}/read", uuid::Uuid::new_v4()),
            Some(&app.landlord_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    // Envelope shape stays uniform
    let (_, body) = app
        .request(
            "PUT",
            &format!("/api/notifications/{}/read", uuid::Uuid::new_v4()),
            Some(&app.landlord_token),
            None,
        )
        .await;
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn noop_transitions_do_not_touch_the_feed() {
    let app = common::spawn().await;
    let listing = app.create_listing("Garden Flat", 45000, 2, "Nairobi").await;
    let appointment = app.book(&id_of(&listing), "2026-09-12").await;
    let cancel = format!("/api/appointments/{}/cancel", id_of(&appointment));

    app.request("PUT", &cancel, Some(&app.landlord_token), None).await;
    app.request("PUT", &cancel, Some(&app.landlord_token), None).await;

    let (_, feed) = app
        .request("GET", "/api/notifications", Some(&app.customer_token), None)
        .await;
    // Exactly one cancellation notice despite two cancel calls
    assert_eq!(feed.as_array().unwrap().len(), 1);
    assert_eq!(feed[0]["type"], "appointment_cancelled");
}
