//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod booking;
pub mod catalog;
pub mod payment;

pub use booking::*;
pub use catalog::*;
pub use payment::*;
