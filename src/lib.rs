//! Dance Booking - class booking admission and Stripe payment reconciliation
//!
//! A class catalog with unique URL slugs, booking admission against a
//! forward booking window and class capacity, Stripe Checkout session
//! creation, and an idempotent webhook reconciler that turns completed
//! payments into confirmed bookings.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
