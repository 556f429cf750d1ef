//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, money, errors)
//! - `catalog` - Class occurrences, slugs, and durations
//! - `booking` - Booking lifecycle and the booking window
//! - `payment` - Checkout requests and Stripe webhook reconciliation

pub mod booking;
pub mod catalog;
pub mod foundation;
pub mod payment;
