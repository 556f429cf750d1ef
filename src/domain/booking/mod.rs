//! Bookings - admission rules and the booking lifecycle.

mod booking;
mod eligibility;
mod errors;
mod status;

pub use booking::{Booking, BookingParty, GuestContact, PaymentReceipt, Transition};
pub use eligibility::{check_eligibility, BookingWindow, DEFAULT_HORIZON_DAYS};
pub use errors::{BookingError, WindowViolation};
pub use status::BookingStatus;
