//! Webhook processor - idempotent handling of verified Stripe events.
//!
//! The processor follows these steps:
//! 1. Check if the event id was already processed
//! 2. Dispatch to the handler registered for the event type
//! 3. Record the outcome (success, ignored, or failed)
//!
//! When two deliveries of one event race, the first to record wins and the
//! other reports `AlreadyProcessed`. Handlers must therefore be idempotent
//! in their own right.

use std::sync::Arc;

use async_trait::async_trait;

use crate::ports::{Clock, SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookResult};

use super::stripe_event::{StripeEvent, StripeEventType};
use super::webhook_errors::WebhookError;

/// Handler for one family of Stripe webhook events.
#[async_trait]
pub trait WebhookEventHandler: Send + Sync {
    /// Returns the event type(s) this handler processes.
    fn handles(&self) -> Vec<StripeEventType>;

    /// Handles the webhook event.
    ///
    /// Returns `Err(WebhookError::Ignored(_))` if the event should be
    /// acknowledged without any state change.
    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError>;
}

/// Routes webhook events to handlers.
#[async_trait]
pub trait WebhookDispatcher: Send + Sync {
    /// Find a handler for the given event type.
    fn get_handler(&self, event_type: &StripeEventType) -> Option<&dyn WebhookEventHandler>;

    /// Dispatch an event to its handler.
    ///
    /// Returns `Err(WebhookError::Ignored)` if no handler is registered.
    async fn dispatch(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let event_type = event.parsed_type();
        match self.get_handler(&event_type) {
            Some(handler) => handler.handle(event).await,
            None => Err(WebhookError::Ignored(format!(
                "No handler for event type: {}",
                event_type
            ))),
        }
    }
}

/// Processes webhook events with idempotency guarantees.
pub struct IdempotentWebhookProcessor {
    repository: Arc<dyn WebhookEventRepository>,
    dispatcher: Arc<dyn WebhookDispatcher>,
    clock: Arc<dyn Clock>,
}

impl IdempotentWebhookProcessor {
    pub fn new(
        repository: Arc<dyn WebhookEventRepository>,
        dispatcher: Arc<dyn WebhookDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            dispatcher,
            clock,
        }
    }

    /// Process a webhook event at most once per event id.
    ///
    /// # Returns
    ///
    /// - `Ok(WebhookResult::Processed)` - handled, or deliberately ignored
    /// - `Ok(WebhookResult::AlreadyProcessed)` - seen before, nothing done
    /// - `Err(_)` - the handler failed; the failure has been recorded
    pub async fn process(&self, event: StripeEvent) -> Result<WebhookResult, WebhookError> {
        if self.repository.find_by_event_id(&event.id).await?.is_some() {
            tracing::info!(event_id = %event.id, event_type = %event.event_type, "Duplicate webhook delivery skipped");
            return Ok(WebhookResult::AlreadyProcessed);
        }

        let result = self.dispatcher.dispatch(&event).await;

        let now = self.clock.now();
        let record = match &result {
            Ok(()) => WebhookEventRecord::success(&event.id, &event.event_type, now),
            Err(WebhookError::Ignored(reason)) => {
                WebhookEventRecord::ignored(&event.id, &event.event_type, reason, now)
            }
            Err(e) => WebhookEventRecord::failed(&event.id, &event.event_type, e.to_string(), now),
        };
        let record = match serde_json::to_value(&event.data.object) {
            Ok(payload) => record.with_payload(payload),
            Err(_) => record,
        };

        match self.repository.save(record).await? {
            SaveResult::Inserted => match result {
                Ok(()) | Err(WebhookError::Ignored(_)) => Ok(WebhookResult::Processed),
                Err(e) => Err(e),
            },
            SaveResult::AlreadyExists => Ok(WebhookResult::AlreadyProcessed),
        }
    }
}
