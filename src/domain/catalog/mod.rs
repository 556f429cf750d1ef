//! Class catalog - scheduled class occurrences, their URL slugs, and durations.

mod class_occurrence;
mod duration;
mod errors;
mod slug;

pub use class_occurrence::{ClassChanges, ClassDetails, ClassOccurrence};
pub use duration::{duration_minutes, parse_time_of_day};
pub use errors::CatalogError;
pub use slug::{resolve_unique_slug, slugify, SlugLookup, MAX_SLUG_SUFFIX};

#[cfg(test)]
pub(crate) use class_occurrence::fixtures;
