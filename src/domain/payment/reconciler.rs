//! Booking reconciliation from verified Stripe events.
//!
//! One handler per event family. Each handler is idempotent on its own:
//! confirming an already-confirmed booking, or inserting a booking whose
//! payment reference is already recorded, changes nothing.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::domain::booking::{
    Booking, BookingParty, BookingStatus, GuestContact, PaymentReceipt, Transition,
};
use crate::domain::foundation::{BookingId, CurrencyCode};
use crate::ports::{BookingRepository, ClassOccurrenceRepository, Clock, SaveResult};

use super::metadata::{CorrelationMetadata, CLASS_ID, USER_ID};
use super::stripe_event::{
    ChargeObject, CheckoutSessionObject, PaymentIntentObject, StripeEvent, StripeEventType,
};
use super::webhook_errors::WebhookError;
use super::webhook_processor::{WebhookDispatcher, WebhookEventHandler};

fn object<T: DeserializeOwned>(event: &StripeEvent) -> Result<T, WebhookError> {
    event.deserialize_object().map_err(|e| {
        tracing::warn!(event_id = %event.id, error = %e, "Unexpected event object shape");
        WebhookError::MissingField("data.object")
    })
}

fn receipt(reference: &str, amount_cents: Option<i64>, currency: Option<&str>) -> PaymentReceipt {
    PaymentReceipt {
        reference: reference.to_string(),
        amount_cents,
        currency: currency.and_then(|c| CurrencyCode::new(c).ok()),
    }
}

/// Booking id from metadata; a malformed id is treated as absent.
fn booking_id_from(meta: &CorrelationMetadata, event: &StripeEvent) -> Option<BookingId> {
    match meta.parsed_booking_id() {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(event_id = %event.id, error = %e, "Ignoring malformed bookingId metadata");
            None
        }
    }
}

async fn confirm_booking(
    bookings: &dyn BookingRepository,
    mut booking: Booking,
    receipt: PaymentReceipt,
    clock: &dyn Clock,
) -> Result<(), WebhookError> {
    let reference = receipt.reference.clone();
    if booking.confirm(receipt, clock.now())? == Transition::Applied {
        bookings.update(&booking).await?;
        tracing::info!(
            booking_id = %booking.id,
            payment_reference = %reference,
            "Booking confirmed"
        );
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// checkout.session.completed
// ════════════════════════════════════════════════════════════════════════════

/// Confirms the booking named in metadata, or records a new paid booking
/// keyed by the payment intent.
pub struct CheckoutCompletedHandler {
    bookings: Arc<dyn BookingRepository>,
    classes: Arc<dyn ClassOccurrenceRepository>,
    clock: Arc<dyn Clock>,
}

impl CheckoutCompletedHandler {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        classes: Arc<dyn ClassOccurrenceRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { bookings, classes, clock }
    }

    fn party_for(session: &CheckoutSessionObject, meta: &CorrelationMetadata) -> Option<BookingParty> {
        meta.party().or_else(|| {
            let email = session.email()?;
            let name = session.customer_details.as_ref().and_then(|d| d.name.as_deref());
            let guest = GuestContact::from_full_name(name, email).ok()?;
            BookingParty::new(None, Some(guest)).ok()
        })
    }
}

#[async_trait]
impl WebhookEventHandler for CheckoutCompletedHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![StripeEventType::CheckoutSessionCompleted]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let session: CheckoutSessionObject = object(event)?;
        let meta = CorrelationMetadata::from_map(&session.metadata);

        let class_id = match meta.parsed_class_id() {
            Ok(Some(id)) => id,
            Ok(None) | Err(_) => {
                tracing::warn!(
                    event_id = %event.id,
                    session_id = %session.id,
                    "Checkout session has no usable classId metadata"
                );
                return Err(WebhookError::Ignored(format!("missing {} metadata", CLASS_ID)));
            }
        };

        let reference = session
            .payment_intent
            .as_deref()
            .ok_or(WebhookError::MissingField("payment_intent"))?;

        if self.classes.find_by_id(&class_id).await?.is_none() {
            return Err(WebhookError::ClassNotFound(class_id.to_string()));
        }

        let paid = receipt(reference, session.amount_total, session.currency.as_deref());

        if let Some(booking_id) = booking_id_from(&meta, event) {
            if let Some(booking) = self.bookings.find_by_id(&booking_id).await? {
                return confirm_booking(self.bookings.as_ref(), booking, paid, self.clock.as_ref()).await;
            }
            tracing::warn!(
                event_id = %event.id,
                booking_id = %booking_id,
                "bookingId metadata names no booking; recording a new one"
            );
        }

        let party = Self::party_for(&session, &meta).unwrap_or_else(|| {
            tracing::warn!(
                event_id = %event.id,
                session_id = %session.id,
                "Checkout carries no {} or customer email; booking is unattributed",
                USER_ID
            );
            BookingParty::unattributed()
        });
        let booking = Booking::paid(BookingId::new(), class_id, party, paid, self.clock.now());

        match self.bookings.insert_if_reference_absent(&booking).await? {
            SaveResult::Inserted => tracing::info!(
                event_id = %event.id,
                booking_id = %booking.id,
                class_id = %class_id,
                payment_reference = %reference,
                "Booking recorded from checkout"
            ),
            SaveResult::AlreadyExists => tracing::info!(
                event_id = %event.id,
                payment_reference = %reference,
                "Payment already recorded; no new booking"
            ),
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// payment_intent.succeeded
// ════════════════════════════════════════════════════════════════════════════

/// Confirms a booking created before payment (embedded storefront flow).
pub struct PaymentSucceededHandler {
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl PaymentSucceededHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { bookings, clock }
    }
}

#[async_trait]
impl WebhookEventHandler for PaymentSucceededHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![StripeEventType::PaymentIntentSucceeded]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let intent: PaymentIntentObject = object(event)?;
        let meta = CorrelationMetadata::from_map(&intent.metadata);

        let booking_id = booking_id_from(&meta, event)
            .ok_or_else(|| WebhookError::Ignored("payment intent carries no bookingId".to_string()))?;
        let booking = self
            .bookings
            .find_by_id(&booking_id)
            .await?
            .ok_or_else(|| WebhookError::BookingNotFound(booking_id.to_string()))?;

        let paid = receipt(
            &intent.id,
            intent.amount_received.or(intent.amount),
            intent.currency.as_deref(),
        );
        confirm_booking(self.bookings.as_ref(), booking, paid, self.clock.as_ref()).await
    }
}

// ════════════════════════════════════════════════════════════════════════════
// payment_intent.payment_failed / payment_intent.canceled
// ════════════════════════════════════════════════════════════════════════════

/// Cancels a still-pending booking whose payment did not go through.
pub struct PaymentFailedHandler {
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl PaymentFailedHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { bookings, clock }
    }
}

#[async_trait]
impl WebhookEventHandler for PaymentFailedHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![
            StripeEventType::PaymentIntentPaymentFailed,
            StripeEventType::PaymentIntentCanceled,
        ]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let intent: PaymentIntentObject = object(event)?;
        let meta = CorrelationMetadata::from_map(&intent.metadata);

        let booking = match booking_id_from(&meta, event) {
            Some(id) => self.bookings.find_by_id(&id).await?,
            None => self.bookings.find_by_payment_reference(&intent.id).await?,
        };
        let Some(mut booking) = booking else {
            return Err(WebhookError::Ignored(format!("no booking for {}", intent.id)));
        };

        if !booking.is_pending() {
            return Err(WebhookError::Ignored(format!("booking is {}", booking.status)));
        }

        booking.cancel(self.clock.now())?;
        self.bookings.update(&booking).await?;
        tracing::info!(
            event_id = %event.id,
            booking_id = %booking.id,
            payment_reference = %intent.id,
            "Booking canceled after failed payment"
        );
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// charge.refunded
// ════════════════════════════════════════════════════════════════════════════

/// Marks a confirmed booking refunded once its charge is fully refunded.
pub struct ChargeRefundedHandler {
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl ChargeRefundedHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { bookings, clock }
    }
}

#[async_trait]
impl WebhookEventHandler for ChargeRefundedHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![StripeEventType::ChargeRefunded]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let charge: ChargeObject = object(event)?;
        if !charge.refunded {
            return Err(WebhookError::Ignored(format!("charge {} only partially refunded", charge.id)));
        }
        let reference = charge
            .payment_intent
            .as_deref()
            .ok_or(WebhookError::MissingField("payment_intent"))?;

        let Some(mut booking) = self.bookings.find_by_payment_reference(reference).await? else {
            return Err(WebhookError::Ignored(format!("no booking for {}", reference)));
        };

        match booking.status {
            BookingStatus::Confirmed | BookingStatus::Refunded => {
                if booking.refund(self.clock.now())? == Transition::Applied {
                    self.bookings.update(&booking).await?;
                    tracing::info!(
                        event_id = %event.id,
                        booking_id = %booking.id,
                        payment_reference = %reference,
                        "Booking refunded"
                    );
                }
                Ok(())
            }
            other => Err(WebhookError::Ignored(format!("booking is {}", other))),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// checkout.session.expired
// ════════════════════════════════════════════════════════════════════════════

/// Releases the spot held by a pending booking whose checkout expired.
pub struct CheckoutExpiredHandler {
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl CheckoutExpiredHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { bookings, clock }
    }
}

#[async_trait]
impl WebhookEventHandler for CheckoutExpiredHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        vec![StripeEventType::CheckoutSessionExpired]
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let session: CheckoutSessionObject = object(event)?;
        let meta = CorrelationMetadata::from_map(&session.metadata);

        let booking_id = booking_id_from(&meta, event)
            .ok_or_else(|| WebhookError::Ignored("expired session carries no bookingId".to_string()))?;
        let Some(mut booking) = self.bookings.find_by_id(&booking_id).await? else {
            return Err(WebhookError::Ignored(format!("no booking {}", booking_id)));
        };
        if !booking.is_pending() {
            return Err(WebhookError::Ignored(format!("booking is {}", booking.status)));
        }

        booking.cancel(self.clock.now())?;
        self.bookings.update(&booking).await?;
        tracing::info!(event_id = %event.id, booking_id = %booking.id, "Booking released after checkout expired");
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Dispatcher
// ════════════════════════════════════════════════════════════════════════════

/// Routes events to the booking handlers above.
pub struct BookingWebhookDispatcher {
    handlers: Vec<Box<dyn WebhookEventHandler>>,
}

impl BookingWebhookDispatcher {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        classes: Arc<dyn ClassOccurrenceRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            handlers: vec![
                Box::new(CheckoutCompletedHandler::new(bookings.clone(), classes, clock.clone())),
                Box::new(PaymentSucceededHandler::new(bookings.clone(), clock.clone())),
                Box::new(PaymentFailedHandler::new(bookings.clone(), clock.clone())),
                Box::new(ChargeRefundedHandler::new(bookings.clone(), clock.clone())),
                Box::new(CheckoutExpiredHandler::new(bookings, clock)),
            ],
        }
    }
}

#[async_trait]
impl WebhookDispatcher for BookingWebhookDispatcher {
    fn get_handler(&self, event_type: &StripeEventType) -> Option<&dyn WebhookEventHandler> {
        self.handlers
            .iter()
            .find(|h| h.handles().contains(event_type))
            .map(|h| h.as_ref())
    }
}
