//! Shared fixtures for HTTP integration tests.
//!
//! Builds the full router over in-memory repositories and the mock payment
//! provider, with the real webhook verifier and system clock.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;

use dance_booking::adapters::http::{router, AppState, WebhookSettings, USER_ID_HEADER};
use dance_booking::adapters::memory::{
    InMemoryBookingRepository, InMemoryClassOccurrenceRepository, InMemoryWebhookEventRepository,
};
use dance_booking::adapters::stripe::MockPaymentProvider;
use dance_booking::domain::booking::BookingWindow;
use dance_booking::domain::foundation::{CurrencyCode, Timestamp};
use dance_booking::domain::payment::{
    signature_header, CheckoutMode, CheckoutSessionObject, CheckoutSettings,
};
use dance_booking::ports::SystemClock;

pub const WEBHOOK_SECRET: &str = "whsec_integration_secret";

pub struct TestApp {
    pub router: Router,
    pub bookings: Arc<InMemoryBookingRepository>,
    pub webhook_events: Arc<InMemoryWebhookEventRepository>,
    pub payments: MockPaymentProvider,
}

impl TestApp {
    pub fn new() -> Self {
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let webhook_events = Arc::new(InMemoryWebhookEventRepository::new());
        let payments = MockPaymentProvider::new();

        let state = AppState {
            classes: Arc::new(InMemoryClassOccurrenceRepository::new()),
            bookings: bookings.clone(),
            webhook_events: webhook_events.clone(),
            payments: Arc::new(payments.clone()),
            clock: Arc::new(SystemClock),
            window: BookingWindow::new(14),
            checkout: CheckoutSettings {
                public_base_url: "https://dance.example".to_string(),
                currency: CurrencyCode::gbp(),
                mode: CheckoutMode::Hosted,
            },
            webhook: WebhookSettings {
                secret: SecretString::new(WEBHOOK_SECRET.to_string()),
                tolerance_secs: 300,
            },
        };

        Self {
            router: router(state),
            bookings,
            webhook_events,
            payments,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", uri, &body, None)).await
    }

    pub async fn post_json_as(&self, user_id: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", uri, &body, Some(user_id))).await
    }

    pub async fn patch_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("PATCH", uri, &body, None)).await
    }

    /// Creates an active class `days_ahead` days from today at 19:00 UTC.
    pub async fn create_class(&self, title: &str, days_ahead: i64, capacity: u32) -> Value {
        let date = (Utc::now() + Duration::days(days_ahead)).date_naive();
        let (status, body) = self
            .post_json(
                "/api/classes",
                json!({
                    "title": title,
                    "date": date.format("%Y-%m-%d").to_string(),
                    "startTime": "19:00",
                    "endTime": "20:00",
                    "price": 25.0,
                    "maxCapacity": capacity,
                    "location": "Studio 1"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create class failed: {}", body);
        body
    }

    pub async fn post_webhook(&self, payload: &[u8], signature: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri("/api/payment-webhook")
                .header("Stripe-Signature", signature)
                .body(Body::from(payload.to_vec()))
                .unwrap(),
        )
        .await
    }
}

fn json_request(method: &str, uri: &str, body: &Value, user_id: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user_id) = user_id {
        builder = builder.header(USER_ID_HEADER, user_id);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// A valid `Stripe-Signature` header for `payload`, signed now.
pub fn sign(payload: &[u8]) -> String {
    signature_header(WEBHOOK_SECRET, Timestamp::now().as_unix_secs(), payload).unwrap()
}

/// Serialized `checkout.session.completed` event wrapping `session`.
pub fn checkout_completed(event_id: &str, session: &CheckoutSessionObject) -> Vec<u8> {
    event(event_id, "checkout.session.completed", serde_json::to_value(session).unwrap())
}

pub fn event(event_id: &str, event_type: &str, object: Value) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "id": event_id,
        "object": "event",
        "type": event_type,
        "created": Timestamp::now().as_unix_secs(),
        "livemode": false,
        "data": { "object": object }
    }))
    .unwrap()
}
