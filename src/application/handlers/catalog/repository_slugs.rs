//! Slug lookups backed by the class occurrence repository.

use async_trait::async_trait;

use crate::domain::catalog::SlugLookup;
use crate::domain::foundation::{ClassOccurrenceId, DomainError};
use crate::ports::ClassOccurrenceRepository;

pub(crate) struct RepositorySlugs<'a>(pub &'a dyn ClassOccurrenceRepository);

#[async_trait]
impl SlugLookup for RepositorySlugs<'_> {
    async fn find_id_by_slug(&self, slug: &str) -> Result<Option<ClassOccurrenceId>, DomainError> {
        Ok(self.0.find_by_slug(slug).await?.map(|class| class.id))
    }
}
