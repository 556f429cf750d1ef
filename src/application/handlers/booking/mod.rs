//! Booking handlers.
//!
//! ## Commands
//! - Creating a pending booking (window and capacity checks)
//! - Confirming a booking from a paid checkout session
//!
//! ## Queries
//! - Get booking details

mod confirm_booking;
mod create_booking;
mod get_booking;

// Commands
pub use confirm_booking::{ConfirmBookingCommand, ConfirmBookingHandler};
pub use create_booking::{CreateBookingCommand, CreateBookingHandler};

// Queries
pub use get_booking::{GetBookingHandler, GetBookingQuery};
