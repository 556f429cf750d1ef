//! Booking admission and confirmation through the HTTP router.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{checkout_completed, sign, TestApp};

fn guest() -> Value {
    json!({"firstName": "Grace", "lastName": "Hopper", "email": "grace@example.com"})
}

async fn create_pending(app: &TestApp, class_id: &str) -> Value {
    let (status, body) = app
        .post_json("/api/bookings", json!({"classId": class_id, "guest": guest()}))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

// ════════════════════════════════════════════════════════════════════════════════
// Catalog
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn repeated_titles_get_suffixed_slugs() {
    let app = TestApp::new();

    let first = app.create_class("Salsa Beginners!", 3, 10).await;
    let second = app.create_class("Salsa  Beginners", 4, 10).await;
    let third = app.create_class("salsa beginners", 5, 10).await;

    assert_eq!(first["slug"], "salsa-beginners");
    assert_eq!(second["slug"], "salsa-beginners-1");
    assert_eq!(third["slug"], "salsa-beginners-2");
}

#[tokio::test]
async fn class_is_reachable_by_id_and_slug() {
    let app = TestApp::new();
    let class = app.create_class("West Coast Swing", 3, 8).await;

    let (by_id, body) = app.get(&format!("/api/classes/{}", class["id"].as_str().unwrap())).await;
    assert_eq!(by_id, StatusCode::OK);
    assert_eq!(body["slug"], "west-coast-swing");
    assert_eq!(body["spotsRemaining"], 8);

    let (by_slug, body) = app.get("/api/classes/west-coast-swing").await;
    assert_eq!(by_slug, StatusCode::OK);
    assert_eq!(body["id"], class["id"]);
}

#[tokio::test]
async fn renaming_a_class_moves_its_slug() {
    let app = TestApp::new();
    let class = app.create_class("Tango", 3, 8).await;

    let (status, body) = app
        .patch_json(
            &format!("/api/classes/{}", class["id"].as_str().unwrap()),
            json!({"title": "Argentine Tango"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["slug"], "argentine-tango");
    let (status, _) = app.get("/api/classes/tango").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn title_without_slug_characters_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .post_json(
            "/api/classes",
            json!({"title": "!!!", "date": "2030-01-01", "price": 10.0, "maxCapacity": 5}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

// ════════════════════════════════════════════════════════════════════════════════
// Admission
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn guest_booking_starts_pending() {
    let app = TestApp::new();
    let class = app.create_class("Salsa Beginners", 3, 10).await;

    let booking = create_pending(&app, class["id"].as_str().unwrap()).await;

    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["guest"]["email"], "grace@example.com");
    assert!(booking["paymentReference"].is_null());
}

#[tokio::test]
async fn signed_in_booking_uses_user_header() {
    let app = TestApp::new();
    let class = app.create_class("Salsa Beginners", 3, 10).await;

    let (status, body) = app
        .post_json_as("user_42", "/api/bookings", json!({"classId": class["id"]}))
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["userId"], "user_42");
}

#[tokio::test]
async fn booking_without_user_or_guest_is_rejected() {
    let app = TestApp::new();
    let class = app.create_class("Salsa Beginners", 3, 10).await;

    let (status, body) = app
        .post_json("/api/bookings", json!({"classId": class["id"]}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn full_class_rejects_further_bookings() {
    let app = TestApp::new();
    let class = app.create_class("Private Lesson", 3, 1).await;
    let class_id = class["id"].as_str().unwrap();

    create_pending(&app, class_id).await;
    let (status, body) = app
        .post_json("/api/bookings", json!({"classId": class_id, "guest": guest()}))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CLASS_FULL");

    let (_, class_view) = app.get(&format!("/api/classes/{}", class_id)).await;
    assert_eq!(class_view["spotsRemaining"], 0);
}

#[tokio::test]
async fn class_beyond_horizon_is_not_bookable() {
    let app = TestApp::new();
    let class = app.create_class("Summer Social", 30, 50).await;

    let (status, body) = app
        .post_json("/api/bookings", json!({"classId": class["id"], "guest": guest()}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_WINDOW");
}

#[tokio::test]
async fn past_class_is_not_bookable() {
    let app = TestApp::new();
    let class = app.create_class("Last Week", -2, 50).await;

    let (status, body) = app
        .post_json("/api/bookings", json!({"classId": class["id"], "guest": guest()}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_WINDOW");
}

#[tokio::test]
async fn unknown_booking_is_404() {
    let app = TestApp::new();
    let (status, _) = app
        .get("/api/bookings/6f1d6a52-2b1e-4c3e-9a53-1b2f0c7d8e90")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ════════════════════════════════════════════════════════════════════════════════
// Confirmation
// ════════════════════════════════════════════════════════════════════════════════

async fn session_for_booking(app: &TestApp, class_id: &str, booking_id: &str) -> String {
    let (status, body) = app
        .post_json(
            "/api/payment-sessions",
            json!({"classId": class_id, "price": 25.0, "bookingId": booking_id, "guest": guest()}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["sessionId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn paid_session_confirms_pending_booking() {
    let app = TestApp::new();
    let class = app.create_class("Salsa Beginners", 3, 10).await;
    let class_id = class["id"].as_str().unwrap();
    let booking = create_pending(&app, class_id).await;
    let booking_id = booking["id"].as_str().unwrap();

    let session_id = session_for_booking(&app, class_id, booking_id).await;
    let request = app.payments.last_request().unwrap();
    assert!(request.success_url.ends_with(&format!("&booking_id={}", booking_id)));

    app.payments.complete_session(&session_id, "pi_return");
    let (status, body) = app
        .post_json(
            &format!("/api/bookings/{}/confirm", booking_id),
            json!({"sessionId": session_id}),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["paymentReference"], "pi_return");
    assert_eq!(body["amountPaidCents"], 2500);
}

#[tokio::test]
async fn unpaid_session_cannot_confirm() {
    let app = TestApp::new();
    let class = app.create_class("Salsa Beginners", 3, 10).await;
    let class_id = class["id"].as_str().unwrap();
    let booking = create_pending(&app, class_id).await;
    let booking_id = booking["id"].as_str().unwrap();
    let session_id = session_for_booking(&app, class_id, booking_id).await;

    let (status, body) = app
        .post_json(
            &format!("/api/bookings/{}/confirm", booking_id),
            json!({"sessionId": session_id}),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "PAYMENT_INCOMPLETE");

    let (_, current) = app.get(&format!("/api/bookings/{}", booking_id)).await;
    assert_eq!(current["status"], "pending");
}

#[tokio::test]
async fn webhook_and_return_page_confirm_once() {
    let app = TestApp::new();
    let class = app.create_class("Salsa Beginners", 3, 10).await;
    let class_id = class["id"].as_str().unwrap();
    let booking = create_pending(&app, class_id).await;
    let booking_id = booking["id"].as_str().unwrap();
    let session_id = session_for_booking(&app, class_id, booking_id).await;

    app.payments.complete_session(&session_id, "pi_both");
    let session = app.payments.session(&session_id).unwrap();
    let payload = checkout_completed("evt_both", &session);
    let (status, _) = app.post_webhook(&payload, &sign(&payload)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post_json(
            &format!("/api/bookings/{}/confirm", booking_id),
            json!({"sessionId": session_id}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");

    let bookings = app.bookings.all().await;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].payment_reference.as_deref(), Some("pi_both"));
}

#[tokio::test]
async fn session_for_another_class_booking_is_rejected() {
    let app = TestApp::new();
    let salsa = app.create_class("Salsa", 3, 10).await;
    let tango = app.create_class("Tango", 3, 10).await;
    let booking = create_pending(&app, salsa["id"].as_str().unwrap()).await;

    let (status, body) = app
        .post_json(
            "/api/payment-sessions",
            json!({"classId": tango["id"], "price": 25.0, "bookingId": booking["id"]}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}
