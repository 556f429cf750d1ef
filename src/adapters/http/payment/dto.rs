//! HTTP DTOs for payment endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::application::handlers::CreatePaymentSessionResult;
use crate::domain::payment::CheckoutSessionObject;

use super::super::booking::dto::GuestDto;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentSessionRequest {
    pub class_id: String,
    /// Major units, e.g. `25.00`.
    pub price: f64,
    /// Account to attribute the booking to. `X-User-Id` wins when both are set.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub guest: Option<GuestDto>,
}

/// Either `redirectUrl` (hosted) or `clientSecret` (embedded) is present.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentSessionResponse {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl From<CreatePaymentSessionResult> for CreatePaymentSessionResponse {
    fn from(result: CreatePaymentSessionResult) -> Self {
        Self {
            session_id: result.session_id,
            redirect_url: result.redirect_url,
            client_secret: result.client_secret,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionResponse {
    pub id: String,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub customer_email: Option<String>,
    pub payment_intent: Option<String>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl From<CheckoutSessionObject> for PaymentSessionResponse {
    fn from(session: CheckoutSessionObject) -> Self {
        Self {
            customer_email: session.email().map(str::to_string),
            id: session.id,
            status: session.status,
            payment_status: session.payment_status,
            payment_intent: session.payment_intent,
            amount_total: session.amount_total,
            currency: session.currency,
            metadata: session.metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookRejection {
    pub error: &'static str,
}
