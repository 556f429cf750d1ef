//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum routes and handlers
//! - `memory` - In-process repositories
//! - `postgres` - sqlx-backed repositories
//! - `stripe` - Stripe Checkout client and test double

pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
