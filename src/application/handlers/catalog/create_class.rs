//! CreateClassHandler - Command handler for scheduling a class occurrence.

use std::sync::Arc;

use crate::domain::catalog::{resolve_unique_slug, slugify, CatalogError, ClassDetails, ClassOccurrence};
use crate::domain::foundation::ClassOccurrenceId;
use crate::ports::{ClassOccurrenceRepository, Clock};

use super::repository_slugs::RepositorySlugs;

/// Command to create a class occurrence.
#[derive(Debug, Clone)]
pub struct CreateClassCommand {
    pub details: ClassDetails,
}

/// Handler for creating class occurrences.
///
/// The slug is derived from the title and made unique by suffixing.
pub struct CreateClassHandler {
    classes: Arc<dyn ClassOccurrenceRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateClassHandler {
    pub fn new(classes: Arc<dyn ClassOccurrenceRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { classes, clock }
    }

    pub async fn handle(&self, cmd: CreateClassCommand) -> Result<ClassOccurrence, CatalogError> {
        let base = slugify(&cmd.details.title);
        if base.is_empty() {
            return Err(CatalogError::InvalidTitle(cmd.details.title));
        }

        let slug = resolve_unique_slug(&base, None, &RepositorySlugs(self.classes.as_ref())).await?;
        let class = ClassOccurrence::create(ClassOccurrenceId::new(), cmd.details, slug, self.clock.now())?;

        self.classes.save(&class).await?;
        tracing::info!(class_id = %class.id, slug = %class.slug, "Class occurrence created");

        Ok(class)
    }
}
