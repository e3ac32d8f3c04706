//! Shared harness: builds the router over the in-memory store, seeds one
//! landlord and one customer, and mints real bearer tokens for them.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use nyumba_api::auth;
use nyumba_api::database::models::{Role, UserPublic};
use nyumba_api::database::MemoryStore;
use nyumba_api::storage::ImageStore;
use nyumba_api::{app, AppState};

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub landlord: UserPublic,
    pub customer: UserPublic,
    pub landlord_token: String,
    pub customer_token: String,
    // Owns the upload directory for the lifetime of the test
    pub upload_dir: tempfile::TempDir,
}

pub async fn spawn() -> TestApp {
    let store = MemoryStore::new();

    let landlord = UserPublic {
        id: Uuid::new_v4(),
        name: "Leah Landlord".to_string(),
        email: "leah@example.com".to_string(),
        phone: Some("+254700000001".to_string()),
        role: Role::Landlord,
    };
    let customer = UserPublic {
        id: Uuid::new_v4(),
        name: "Carl Customer".to_string(),
        email: "carl@example.com".to_string(),
        phone: Some("+254700000002".to_string()),
        role: Role::Customer,
    };
    store.add_user(landlord.clone()).await;
    store.add_user(customer.clone()).await;

    let landlord_token = auth::issue_token(landlord.id, landlord.role).expect("token");
    let customer_token = auth::issue_token(customer.id, customer.role).expect("token");

    let upload_dir = tempfile::tempdir().expect("temp upload dir");
    let images = ImageStore::new(upload_dir.path());
    images.ensure_dir().await.expect("upload dir");

    let state = AppState {
        store: Arc::new(store.clone()),
        images,
    };

    TestApp {
        router: app(state),
        store,
        landlord,
        customer,
        landlord_token,
        customer_token,
        upload_dir,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Create a listing through the API as the seeded landlord.
    pub async fn create_listing(&self, title: &str, price: i64, bedrooms: i32, city: &str) -> Value {
        let (status, body) = self
            .request(
                "POST",
                "/api/listings",
                Some(&self.landlord_token),
                Some(json!({
                    "title": title,
                    "description": "Sunny two-bedroom with a balcony",
                    "location": {
                        "address": "12 Riverside Drive",
                        "city": city,
                        "state": "Nairobi County"
                    },
                    "price": price,
                    "bedrooms": bedrooms,
                    "bathrooms": 1,
                    "area": 80,
                    "propertyType": "apartment"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "listing create failed: {}", body);
        body
    }

    /// Book the given listing through the API as the seeded customer.
    pub async fn book(&self, listing_id: &str, date: &str) -> Value {
        let (status, body) = self
            .request(
                "POST",
                "/api/appointments",
                Some(&self.customer_token),
                Some(json!({
                    "listingId": listing_id,
                    "date": date,
                    "time": "14:00",
                    "message": "Can I view this weekend?"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "booking failed: {}", body);
        body
    }
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id").to_string()
}
