//! Shared application state.
//!
//! Cloned per request; every dependency is an `Arc`, and handlers are built
//! on demand from it.

use std::sync::Arc;

use secrecy::SecretString;

use crate::application::handlers::{
    ConfirmBookingHandler, CreateBookingHandler, CreateClassHandler, CreatePaymentSessionHandler,
    GetBookingHandler, GetClassHandler, GetPaymentSessionHandler, HandlePaymentWebhookHandler,
    ListClassesHandler, UpdateClassHandler,
};
use crate::domain::booking::BookingWindow;
use crate::domain::payment::{
    BookingWebhookDispatcher, CheckoutSettings, IdempotentWebhookProcessor, StripeWebhookVerifier,
};
use crate::ports::{
    BookingRepository, ClassOccurrenceRepository, Clock, PaymentProvider, WebhookEventRepository,
};

/// Webhook signing secret and replay tolerance.
#[derive(Debug, Clone)]
pub struct WebhookSettings {
    pub secret: SecretString,
    pub tolerance_secs: i64,
}

#[derive(Clone)]
pub struct AppState {
    pub classes: Arc<dyn ClassOccurrenceRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub webhook_events: Arc<dyn WebhookEventRepository>,
    pub payments: Arc<dyn PaymentProvider>,
    pub clock: Arc<dyn Clock>,
    pub window: BookingWindow,
    pub checkout: CheckoutSettings,
    pub webhook: WebhookSettings,
}

impl AppState {
    // Catalog

    pub fn create_class_handler(&self) -> CreateClassHandler {
        CreateClassHandler::new(self.classes.clone(), self.clock.clone())
    }

    pub fn update_class_handler(&self) -> UpdateClassHandler {
        UpdateClassHandler::new(self.classes.clone(), self.clock.clone())
    }

    pub fn list_classes_handler(&self) -> ListClassesHandler {
        ListClassesHandler::new(self.classes.clone())
    }

    pub fn get_class_handler(&self) -> GetClassHandler {
        GetClassHandler::new(self.classes.clone(), self.bookings.clone())
    }

    // Bookings

    pub fn create_booking_handler(&self) -> CreateBookingHandler {
        CreateBookingHandler::new(
            self.classes.clone(),
            self.bookings.clone(),
            self.clock.clone(),
            self.window,
        )
    }

    pub fn get_booking_handler(&self) -> GetBookingHandler {
        GetBookingHandler::new(self.bookings.clone())
    }

    pub fn confirm_booking_handler(&self) -> ConfirmBookingHandler {
        ConfirmBookingHandler::new(self.bookings.clone(), self.payments.clone(), self.clock.clone())
    }

    // Payments

    pub fn create_payment_session_handler(&self) -> CreatePaymentSessionHandler {
        CreatePaymentSessionHandler::new(
            self.classes.clone(),
            self.bookings.clone(),
            self.payments.clone(),
            self.checkout.clone(),
        )
    }

    pub fn get_payment_session_handler(&self) -> GetPaymentSessionHandler {
        GetPaymentSessionHandler::new(self.payments.clone())
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        let verifier = StripeWebhookVerifier::new(self.webhook.secret.clone())
            .with_tolerance(self.webhook.tolerance_secs);
        let dispatcher = Arc::new(BookingWebhookDispatcher::new(
            self.bookings.clone(),
            self.classes.clone(),
            self.clock.clone(),
        ));
        let processor =
            IdempotentWebhookProcessor::new(self.webhook_events.clone(), dispatcher, self.clock.clone());
        HandlePaymentWebhookHandler::new(verifier, processor, self.clock.clone())
    }
}
