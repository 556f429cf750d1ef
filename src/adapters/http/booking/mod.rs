//! HTTP adapter for bookings.
//!
//! - `POST /api/bookings` - Create a pending booking
//! - `GET /api/bookings/:id` - Booking details
//! - `POST /api/bookings/:id/confirm` - Confirm against a paid checkout session

pub mod dto;
mod handlers;
mod routes;

pub(crate) use handlers::parse_id;
pub use routes::booking_routes;
