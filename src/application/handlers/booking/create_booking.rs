//! CreateBookingHandler - Command handler for public class bookings.

use std::sync::Arc;

use crate::domain::booking::{check_eligibility, Booking, BookingError, BookingParty, BookingWindow};
use crate::domain::foundation::{BookingId, ClassOccurrenceId};
use crate::ports::{BookingRepository, ClassOccurrenceRepository, Clock};

/// Command to book a place in a class.
#[derive(Debug, Clone)]
pub struct CreateBookingCommand {
    pub class_id: ClassOccurrenceId,
    pub party: BookingParty,
}

/// Handler for public bookings.
///
/// Checks the booking window and remaining capacity, then records a pending
/// booking that payment later confirms.
pub struct CreateBookingHandler {
    classes: Arc<dyn ClassOccurrenceRepository>,
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
    window: BookingWindow,
}

impl CreateBookingHandler {
    pub fn new(
        classes: Arc<dyn ClassOccurrenceRepository>,
        bookings: Arc<dyn BookingRepository>,
        clock: Arc<dyn Clock>,
        window: BookingWindow,
    ) -> Self {
        Self {
            classes,
            bookings,
            clock,
            window,
        }
    }

    pub async fn handle(&self, cmd: CreateBookingCommand) -> Result<Booking, BookingError> {
        let now = self.clock.now();

        // 1. Class must exist, be active, and fall inside the window
        let class = check_eligibility(self.classes.as_ref(), &cmd.class_id, self.window, now).await?;

        // 2. Capacity
        let taken = self.bookings.count_holding_spots(&class.id).await?;
        if class.spots_remaining(taken) == 0 {
            tracing::info!(class_id = %class.id, taken, "Booking refused, class is full");
            return Err(BookingError::ClassFull { class_id: class.id });
        }

        // 3. Persist pending booking
        let booking = Booking::pending(BookingId::new(), class.id, cmd.party, now);
        self.bookings.save(&booking).await?;

        tracing::info!(booking_id = %booking.id, class_id = %class.id, "Booking created");
        Ok(booking)
    }
}
