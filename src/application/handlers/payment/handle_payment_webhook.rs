//! HandlePaymentWebhookHandler - Command handler for Stripe webhook deliveries.
//!
//! Verification failures are the only errors surfaced to the caller; once an
//! event is authentic it is always acknowledged, and business failures are
//! logged and kept in the webhook event log instead.

use std::sync::Arc;

use crate::domain::payment::{IdempotentWebhookProcessor, StripeWebhookVerifier, WebhookError};
use crate::ports::{Clock, WebhookResult};

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header value.
    pub signature: String,
}

/// Outcome of an authentic delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// Event handled or deliberately ignored.
    Processed { event_id: String },
    /// Event id already in the log.
    Duplicate { event_id: String },
    /// A handler failed; recorded as failed and acknowledged anyway.
    BusinessFailure { event_id: String, reason: String },
}

pub struct HandlePaymentWebhookHandler {
    verifier: StripeWebhookVerifier,
    processor: IdempotentWebhookProcessor,
    clock: Arc<dyn Clock>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: StripeWebhookVerifier,
        processor: IdempotentWebhookProcessor,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            verifier,
            processor,
            clock,
        }
    }

    /// # Errors
    ///
    /// Only verification failures (`is_verification_failure()`).
    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        // 1. Verify signature against the raw body, then parse
        let now = self.clock.now().as_unix_secs();
        let event = self
            .verifier
            .verify_and_parse_at(&cmd.payload, &cmd.signature, now)
            .map_err(|e| {
                tracing::warn!(error = %e, "Webhook verification failed");
                e
            })?;

        let event_id = event.id.clone();
        let event_type = event.event_type.clone();

        // 2. Dedupe, dispatch, and record
        match self.processor.process(event).await {
            Ok(WebhookResult::Processed) => {
                tracing::info!(event_id = %event_id, event_type = %event_type, "Webhook processed");
                Ok(HandlePaymentWebhookResult::Processed { event_id })
            }
            Ok(WebhookResult::AlreadyProcessed) => {
                Ok(HandlePaymentWebhookResult::Duplicate { event_id })
            }
            Err(e) => {
                tracing::error!(
                    event_id = %event_id,
                    event_type = %event_type,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Webhook business failure"
                );
                Ok(HandlePaymentWebhookResult::BusinessFailure {
                    event_id,
                    reason: e.to_string(),
                })
            }
        }
    }
}
