//! GetBookingHandler - Query handler for a single booking.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError};
use crate::domain::foundation::BookingId;
use crate::ports::BookingRepository;

#[derive(Debug, Clone)]
pub struct GetBookingQuery {
    pub booking_id: BookingId,
}

pub struct GetBookingHandler {
    bookings: Arc<dyn BookingRepository>,
}

impl GetBookingHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn handle(&self, query: GetBookingQuery) -> Result<Booking, BookingError> {
        self.bookings
            .find_by_id(&query.booking_id)
            .await?
            .ok_or_else(|| BookingError::not_found(query.booking_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBookingRepository;
    use crate::domain::booking::BookingParty;
    use crate::domain::foundation::{ClassOccurrenceId, Timestamp, UserId};

    #[tokio::test]
    async fn returns_saved_booking() {
        let repo = Arc::new(InMemoryBookingRepository::new());
        let booking = Booking::pending(
            BookingId::new(),
            ClassOccurrenceId::new(),
            BookingParty::user(UserId::new("u-1").unwrap()),
            Timestamp::now(),
        );
        repo.save(&booking).await.unwrap();
        let handler = GetBookingHandler::new(repo);

        let found = handler
            .handle(GetBookingQuery { booking_id: booking.id })
            .await
            .unwrap();
        assert_eq!(found, booking);
    }

    #[tokio::test]
    async fn missing_booking_is_not_found() {
        let handler = GetBookingHandler::new(Arc::new(InMemoryBookingRepository::new()));

        let result = handler
            .handle(GetBookingQuery { booking_id: BookingId::new() })
            .await;
        assert!(matches!(result, Err(BookingError::NotFound(_))));
    }
}
