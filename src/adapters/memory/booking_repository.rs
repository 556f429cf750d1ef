//! In-memory bookings with a unique payment-reference index.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, ClassOccurrenceId, DomainError, ErrorCode};
use crate::ports::{BookingRepository, SaveResult};

#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<HashMap<BookingId, Booking>>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored booking, in no particular order.
    pub async fn all(&self) -> Vec<Booking> {
        self.bookings.read().await.values().cloned().collect()
    }
}

fn reference_taken(bookings: &HashMap<BookingId, Booking>, booking: &Booking) -> bool {
    match &booking.payment_reference {
        Some(reference) => bookings
            .values()
            .any(|b| b.id != booking.id && b.payment_reference.as_ref() == Some(reference)),
        None => false,
    }
}

fn reference_conflict(booking: &Booking) -> DomainError {
    DomainError::new(ErrorCode::Conflict, "Payment reference already recorded")
        .with_detail("payment_reference", booking.payment_reference.clone().unwrap_or_default())
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        let mut bookings = self.bookings.write().await;
        if bookings.contains_key(&booking.id) {
            return Err(DomainError::new(ErrorCode::Conflict, "Booking already exists"));
        }
        if reference_taken(&bookings, booking) {
            return Err(reference_conflict(booking));
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), DomainError> {
        let mut bookings = self.bookings.write().await;
        if !bookings.contains_key(&booking.id) {
            return Err(DomainError::new(ErrorCode::BookingNotFound, "Booking not found"));
        }
        if reference_taken(&bookings, booking) {
            return Err(reference_conflict(booking));
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        Ok(self.bookings.read().await.get(id).cloned())
    }

    async fn find_by_payment_reference(&self, reference: &str) -> Result<Option<Booking>, DomainError> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .find(|b| b.payment_reference.as_deref() == Some(reference))
            .cloned())
    }

    async fn insert_if_reference_absent(&self, booking: &Booking) -> Result<SaveResult, DomainError> {
        if booking.payment_reference.is_none() {
            return Err(DomainError::validation("payment_reference", "Paid bookings need a payment reference"));
        }
        let mut bookings = self.bookings.write().await;
        if reference_taken(&bookings, booking) || bookings.contains_key(&booking.id) {
            return Ok(SaveResult::AlreadyExists);
        }
        bookings.insert(booking.id, booking.clone());
        Ok(SaveResult::Inserted)
    }

    async fn count_holding_spots(&self, class_id: &ClassOccurrenceId) -> Result<u32, DomainError> {
        let count = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.class_occurrence_id == *class_id && b.status.holds_spot())
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}
