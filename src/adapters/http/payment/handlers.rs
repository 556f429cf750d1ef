//! HTTP handlers for payment endpoints.

use axum::body::Bytes;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::{
    CreatePaymentSessionCommand, GetPaymentSessionQuery, HandlePaymentWebhookCommand,
    HandlePaymentWebhookResult,
};
use crate::domain::foundation::{BookingId, ClassOccurrenceId, UserId};

use super::super::booking::{dto::booking_party, parse_id};
use super::super::error::ApiError;
use super::super::extract::OptionalUser;
use super::super::state::AppState;
use super::dto::{
    CreatePaymentSessionRequest, CreatePaymentSessionResponse, PaymentSessionResponse, WebhookAck,
    WebhookRejection,
};

pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// POST /api/payment-sessions - Open a checkout session for a class
pub async fn create_payment_session(
    State(state): State<AppState>,
    OptionalUser(user_id): OptionalUser,
    Json(request): Json<CreatePaymentSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let class_id: ClassOccurrenceId = parse_id("classId", &request.class_id)?;
    let booking_id: Option<BookingId> = request
        .booking_id
        .as_deref()
        .map(|raw| parse_id("bookingId", raw))
        .transpose()?;
    let customer_email = request
        .customer_email
        .or_else(|| request.guest.as_ref().map(|g| g.email.clone()));
    let user_id = match user_id {
        Some(id) => Some(id),
        None => request.user_id.map(UserId::new).transpose()?,
    };
    let party = booking_party(user_id, request.guest)?;

    let result = state
        .create_payment_session_handler()
        .handle(CreatePaymentSessionCommand {
            class_id,
            price: request.price,
            party,
            booking_id,
            customer_email,
        })
        .await?;

    Ok(Json(CreatePaymentSessionResponse::from(result)))
}

/// GET /api/payment-sessions/:id - Checkout session status
pub async fn get_payment_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .get_payment_session_handler()
        .handle(GetPaymentSessionQuery { session_id })
        .await?;
    Ok(Json(PaymentSessionResponse::from(session)))
}

/// POST /api/payment-webhook - Stripe webhook deliveries
///
/// Takes the raw body so the signature is checked over the exact bytes
/// Stripe signed. Authentic events are always acknowledged.
pub async fn handle_payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        tracing::warn!("Webhook delivery without signature header");
        return verification_failed();
    };

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    match state.webhook_handler().handle(cmd).await {
        Ok(result) => {
            if let HandlePaymentWebhookResult::BusinessFailure { event_id, reason } = &result {
                tracing::error!(event_id = %event_id, reason = %reason, "Webhook acknowledged after failure");
            }
            (StatusCode::OK, Json(WebhookAck { received: true })).into_response()
        }
        Err(_) => verification_failed(),
    }
}

fn verification_failed() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(WebhookRejection {
            error: "verification failed",
        }),
    )
        .into_response()
}
