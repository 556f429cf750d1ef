//! Class occurrence repository port.
//!
//! Persists the class catalog. Slugs are unique across all occurrences;
//! implementations must reject a second occurrence with the same slug.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::catalog::ClassOccurrence;
use crate::domain::foundation::{ClassOccurrenceId, DomainError};

/// Date-range filter for catalog listings. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassListFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub include_inactive: bool,
}

impl ClassListFilter {
    /// Whether an occurrence falls inside this filter.
    pub fn matches(&self, class: &ClassOccurrence) -> bool {
        (self.include_inactive || class.is_active)
            && self.start_date.map_or(true, |start| class.date >= start)
            && self.end_date.map_or(true, |end| class.date <= end)
    }
}

#[async_trait]
pub trait ClassOccurrenceRepository: Send + Sync {
    /// Save a new occurrence.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the slug is already taken
    /// - `DatabaseError` on persistence failure
    async fn save(&self, class: &ClassOccurrence) -> Result<(), DomainError>;

    /// Update an existing occurrence.
    ///
    /// # Errors
    ///
    /// - `ClassNotFound` if the occurrence doesn't exist
    /// - `Conflict` if the new slug is already taken
    async fn update(&self, class: &ClassOccurrence) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ClassOccurrenceId) -> Result<Option<ClassOccurrence>, DomainError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ClassOccurrence>, DomainError>;

    /// Occurrences matching the filter, ordered by date then start time.
    async fn list(&self, filter: &ClassListFilter) -> Result<Vec<ClassOccurrence>, DomainError>;
}
