//! HTTP adapter for the class catalog.
//!
//! - `GET /api/classes` - List classes in a date range
//! - `GET /api/classes/:idOrSlug` - One class with remaining spots
//! - `POST /api/classes` - Create a class
//! - `PATCH /api/classes/:id` - Update a class

pub mod dto;
mod handlers;
mod routes;

pub use routes::catalog_routes;
