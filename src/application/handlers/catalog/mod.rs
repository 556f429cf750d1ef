//! Class catalog handlers.
//!
//! ## Commands
//! - Creating a class occurrence (unique slug, derived duration)
//! - Updating a class occurrence (slug regenerated on title change)
//!
//! ## Queries
//! - Listing classes in a date range
//! - Fetching one class by id or slug, with remaining spots

mod create_class;
mod get_class;
mod list_classes;
mod repository_slugs;
mod update_class;

// Commands
pub use create_class::{CreateClassCommand, CreateClassHandler};
pub use update_class::{UpdateClassCommand, UpdateClassHandler};

// Queries
pub use get_class::{ClassAvailability, GetClassHandler, GetClassQuery};
pub use list_classes::{ListClassesHandler, ListClassesQuery};
