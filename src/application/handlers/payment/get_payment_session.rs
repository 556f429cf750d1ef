//! GetPaymentSessionHandler - Reads checkout session status from the provider.

use std::sync::Arc;

use crate::domain::booking::BookingError;
use crate::domain::payment::CheckoutSessionObject;
use crate::ports::PaymentProvider;

#[derive(Debug, Clone)]
pub struct GetPaymentSessionQuery {
    pub session_id: String,
}

pub struct GetPaymentSessionHandler {
    payments: Arc<dyn PaymentProvider>,
}

impl GetPaymentSessionHandler {
    pub fn new(payments: Arc<dyn PaymentProvider>) -> Self {
        Self { payments }
    }

    pub async fn handle(&self, query: GetPaymentSessionQuery) -> Result<CheckoutSessionObject, BookingError> {
        self.payments
            .retrieve_checkout_session(&query.session_id)
            .await
            .map_err(|e| {
                tracing::error!(session_id = %query.session_id, error = %e, "Checkout session lookup failed");
                BookingError::from(e)
            })?
            .ok_or_else(|| BookingError::not_found(&query.session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::ports::PaymentError;

    #[tokio::test]
    async fn returns_known_session() {
        let mock = MockPaymentProvider::new();
        mock.set_session(CheckoutSessionObject {
            id: "cs_known".to_string(),
            status: Some("complete".to_string()),
            payment_status: Some("paid".to_string()),
            ..Default::default()
        });
        let handler = GetPaymentSessionHandler::new(Arc::new(mock));

        let session = handler
            .handle(GetPaymentSessionQuery { session_id: "cs_known".to_string() })
            .await
            .unwrap();
        assert!(session.is_paid());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let handler = GetPaymentSessionHandler::new(Arc::new(MockPaymentProvider::new()));

        let result = handler
            .handle(GetPaymentSessionQuery { session_id: "cs_nope".to_string() })
            .await;
        assert!(matches!(result, Err(BookingError::NotFound(_))));
    }

    #[tokio::test]
    async fn provider_failure_is_reported() {
        let mock = MockPaymentProvider::new();
        mock.set_error(PaymentError::provider("boom"));
        let handler = GetPaymentSessionHandler::new(Arc::new(mock));

        let result = handler
            .handle(GetPaymentSessionQuery { session_id: "cs_1".to_string() })
            .await;
        assert!(matches!(result, Err(BookingError::PaymentSession { .. })));
    }
}
