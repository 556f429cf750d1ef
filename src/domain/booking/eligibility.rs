//! Booking window rules.
//!
//! A class can be booked from now until `horizon_days` ahead. Only the class
//! date counts, taken as midnight UTC; the start time plays no part. A class
//! dated today is therefore already past.

use crate::domain::catalog::ClassOccurrence;
use crate::domain::foundation::{ClassOccurrenceId, Timestamp};
use crate::ports::ClassOccurrenceRepository;

use super::{BookingError, WindowViolation};

/// Default number of days ahead a class may be booked.
pub const DEFAULT_HORIZON_DAYS: u32 = 14;

/// The span of time in which classes accept bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    horizon_days: u32,
}

impl BookingWindow {
    pub fn new(horizon_days: u32) -> Self {
        Self { horizon_days }
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// Checks a class date instant against `now`.
    ///
    /// A class exactly at the horizon is still bookable.
    pub fn check(&self, class_at: Timestamp, now: Timestamp) -> Result<(), WindowViolation> {
        if class_at.is_before(&now) {
            return Err(WindowViolation::Past);
        }
        let horizon = now.add_days(i64::from(self.horizon_days));
        if class_at.is_after(&horizon) {
            return Err(WindowViolation::BeyondHorizon { horizon_days: self.horizon_days });
        }
        Ok(())
    }
}

impl Default for BookingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON_DAYS)
    }
}

/// Loads a class and verifies it can be booked right now.
///
/// Inactive classes are reported as not found.
pub async fn check_eligibility(
    classes: &dyn ClassOccurrenceRepository,
    class_id: &ClassOccurrenceId,
    window: BookingWindow,
    now: Timestamp,
) -> Result<ClassOccurrence, BookingError> {
    let class = classes
        .find_by_id(class_id)
        .await?
        .filter(|c| c.is_active)
        .ok_or(BookingError::ClassNotFound(*class_id))?;

    window
        .check(class.date_instant(), now)
        .map_err(BookingError::InvalidWindow)?;

    Ok(class)
}
