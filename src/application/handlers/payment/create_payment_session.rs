//! CreatePaymentSessionHandler - Opens a provider checkout session for a class.

use std::sync::Arc;

use crate::domain::booking::{BookingError, BookingParty};
use crate::domain::foundation::{BookingId, ClassOccurrenceId, ValidationError};
use crate::domain::payment::{build_checkout_request, CheckoutOrder, CheckoutSettings};
use crate::ports::{BookingRepository, ClassOccurrenceRepository, PaymentProvider};

/// Command to start checkout for one place in a class.
#[derive(Debug, Clone)]
pub struct CreatePaymentSessionCommand {
    pub class_id: ClassOccurrenceId,
    /// Decimal price in major units.
    pub price: f64,
    pub party: Option<BookingParty>,
    /// Existing pending booking this payment settles.
    pub booking_id: Option<BookingId>,
    pub customer_email: Option<String>,
}

/// Where the customer goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentSessionResult {
    pub session_id: String,
    /// Hosted checkout page.
    pub redirect_url: Option<String>,
    /// Embedded checkout widget secret.
    pub client_secret: Option<String>,
}

pub struct CreatePaymentSessionHandler {
    classes: Arc<dyn ClassOccurrenceRepository>,
    bookings: Arc<dyn BookingRepository>,
    payments: Arc<dyn PaymentProvider>,
    settings: CheckoutSettings,
}

impl CreatePaymentSessionHandler {
    pub fn new(
        classes: Arc<dyn ClassOccurrenceRepository>,
        bookings: Arc<dyn BookingRepository>,
        payments: Arc<dyn PaymentProvider>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            classes,
            bookings,
            payments,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentSessionCommand,
    ) -> Result<CreatePaymentSessionResult, BookingError> {
        let class = self
            .classes
            .find_by_id(&cmd.class_id)
            .await?
            .ok_or(BookingError::ClassNotFound(cmd.class_id))?;

        if let Some(booking_id) = &cmd.booking_id {
            let booking = self
                .bookings
                .find_by_id(booking_id)
                .await?
                .ok_or_else(|| BookingError::not_found(booking_id))?;
            if booking.class_occurrence_id != class.id {
                return Err(ValidationError::invalid_format(
                    "bookingId",
                    "booking is for a different class",
                )
                .into());
            }
        }

        let request = build_checkout_request(
            &self.settings,
            &CheckoutOrder {
                class: &class,
                price: cmd.price,
                party: cmd.party,
                booking_id: cmd.booking_id,
                customer_email: cmd.customer_email,
            },
        )?;
        let unit_amount = request.line_item.unit_amount;

        let session = self
            .payments
            .create_checkout_session(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    class_id = %class.id,
                    error = %e,
                    retryable = e.retryable,
                    "Failed to create checkout session"
                );
                BookingError::from(e)
            })?;

        tracing::info!(
            class_id = %class.id,
            session_id = %session.id,
            unit_amount,
            "Checkout session opened"
        );

        Ok(CreatePaymentSessionResult {
            session_id: session.id,
            redirect_url: session.url,
            client_secret: session.client_secret,
        })
    }
}
