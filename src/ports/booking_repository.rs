//! Booking repository port.
//!
//! `payment_reference` is unique across bookings. That constraint is what
//! makes webhook reconciliation safe under redelivery: a second attempt to
//! record the same payment finds the first row instead of creating another.

use async_trait::async_trait;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, ClassOccurrenceId, DomainError};

use super::SaveResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Save a new booking.
    ///
    /// # Errors
    ///
    /// - `Conflict` if another booking holds the same payment reference
    /// - `DatabaseError` on persistence failure
    async fn save(&self, booking: &Booking) -> Result<(), DomainError>;

    /// Update an existing booking.
    ///
    /// # Errors
    ///
    /// - `BookingNotFound` if the booking doesn't exist
    /// - `Conflict` if the payment reference is taken by another booking
    async fn update(&self, booking: &Booking) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    async fn find_by_payment_reference(&self, reference: &str) -> Result<Option<Booking>, DomainError>;

    /// Insert a paid booking unless its payment reference is already recorded.
    ///
    /// Returns `AlreadyExists` without writing when the reference is taken.
    /// The booking must carry a payment reference.
    async fn insert_if_reference_absent(&self, booking: &Booking) -> Result<SaveResult, DomainError>;

    /// Number of pending or confirmed bookings for a class.
    async fn count_holding_spots(&self, class_id: &ClassOccurrenceId) -> Result<u32, DomainError>;
}
