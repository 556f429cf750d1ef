//! ConfirmBookingHandler - Confirms a booking from a paid checkout session.
//!
//! The storefront calls this after the customer returns from checkout. The
//! session is re-read from the payment provider rather than trusted from the
//! client, and the booking is only confirmed when the session is paid and
//! its metadata names this booking. Confirmation goes through the same
//! idempotent transition the webhook uses, so whichever arrives second is a
//! no-op.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError, PaymentReceipt, Transition};
use crate::domain::foundation::{BookingId, CurrencyCode, ValidationError};
use crate::domain::payment::CorrelationMetadata;
use crate::ports::{BookingRepository, Clock, PaymentProvider};

#[derive(Debug, Clone)]
pub struct ConfirmBookingCommand {
    pub booking_id: BookingId,
    pub session_id: String,
}

pub struct ConfirmBookingHandler {
    bookings: Arc<dyn BookingRepository>,
    payments: Arc<dyn PaymentProvider>,
    clock: Arc<dyn Clock>,
}

impl ConfirmBookingHandler {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        payments: Arc<dyn PaymentProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bookings,
            payments,
            clock,
        }
    }

    pub async fn handle(&self, cmd: ConfirmBookingCommand) -> Result<Booking, BookingError> {
        if cmd.session_id.trim().is_empty() {
            return Err(ValidationError::empty_field("sessionId").into());
        }

        let mut booking = self
            .bookings
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| BookingError::not_found(cmd.booking_id))?;

        let session = self
            .payments
            .retrieve_checkout_session(&cmd.session_id)
            .await
            .map_err(|e| {
                tracing::error!(session_id = %cmd.session_id, error = %e, "Checkout session lookup failed");
                BookingError::from(e)
            })?
            .ok_or_else(|| BookingError::not_found(&cmd.session_id))?;

        let meta = CorrelationMetadata::from_map(&session.metadata);
        if meta.booking_id.as_deref() != Some(cmd.booking_id.to_string().as_str()) {
            tracing::warn!(
                booking_id = %cmd.booking_id,
                session_id = %session.id,
                "Checkout session belongs to a different booking"
            );
            return Err(ValidationError::invalid_format(
                "sessionId",
                "checkout session does not belong to this booking",
            )
            .into());
        }

        let reference = match (session.is_paid(), session.payment_intent.as_deref()) {
            (true, Some(reference)) => reference.to_string(),
            _ => {
                return Err(BookingError::PaymentIncomplete {
                    session_id: session.id,
                })
            }
        };

        let receipt = PaymentReceipt {
            reference,
            amount_cents: session.amount_total,
            currency: session.currency.as_deref().and_then(|c| CurrencyCode::new(c).ok()),
        };

        if booking.confirm(receipt, self.clock.now())? == Transition::Applied {
            self.bookings.update(&booking).await?;
            tracing::info!(
                booking_id = %booking.id,
                payment_reference = ?booking.payment_reference,
                "Booking confirmed from checkout return"
            );
        }

        Ok(booking)
    }
}
