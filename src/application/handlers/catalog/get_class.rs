//! GetClassHandler - Query handler for a single class occurrence.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, ClassOccurrence};
use crate::domain::foundation::ClassOccurrenceId;
use crate::ports::{BookingRepository, ClassOccurrenceRepository};

/// Look up a class by UUID or by slug.
#[derive(Debug, Clone)]
pub struct GetClassQuery {
    pub id_or_slug: String,
}

/// A class with its live availability.
#[derive(Debug, Clone)]
pub struct ClassAvailability {
    pub class: ClassOccurrence,
    pub spots_remaining: u32,
}

pub struct GetClassHandler {
    classes: Arc<dyn ClassOccurrenceRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl GetClassHandler {
    pub fn new(
        classes: Arc<dyn ClassOccurrenceRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        Self { classes, bookings }
    }

    pub async fn handle(&self, query: GetClassQuery) -> Result<ClassAvailability, CatalogError> {
        let found = match query.id_or_slug.parse::<ClassOccurrenceId>() {
            Ok(id) => self.classes.find_by_id(&id).await?,
            Err(_) => self.classes.find_by_slug(&query.id_or_slug).await?,
        };
        let class = found.ok_or_else(|| CatalogError::not_found(query.id_or_slug.clone()))?;

        let taken = self.bookings.count_holding_spots(&class.id).await?;
        Ok(ClassAvailability {
            spots_remaining: class.spots_remaining(taken),
            class,
        })
    }
}
