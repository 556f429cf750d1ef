//! UpdateClassHandler - Command handler for editing a class occurrence.

use std::sync::Arc;

use crate::domain::catalog::{resolve_unique_slug, slugify, CatalogError, ClassChanges, ClassOccurrence};
use crate::domain::foundation::ClassOccurrenceId;
use crate::ports::{ClassOccurrenceRepository, Clock};

use super::repository_slugs::RepositorySlugs;

/// Command to update a class occurrence.
#[derive(Debug, Clone)]
pub struct UpdateClassCommand {
    pub class_id: ClassOccurrenceId,
    pub changes: ClassChanges,
}

/// Handler for editing class occurrences.
///
/// A title change regenerates the slug. The record's own slug never counts
/// as a collision, so re-saving an unchanged title keeps it.
pub struct UpdateClassHandler {
    classes: Arc<dyn ClassOccurrenceRepository>,
    clock: Arc<dyn Clock>,
}

impl UpdateClassHandler {
    pub fn new(classes: Arc<dyn ClassOccurrenceRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { classes, clock }
    }

    pub async fn handle(&self, cmd: UpdateClassCommand) -> Result<ClassOccurrence, CatalogError> {
        let mut class = self
            .classes
            .find_by_id(&cmd.class_id)
            .await?
            .ok_or_else(|| CatalogError::not_found(cmd.class_id.to_string()))?;

        let new_slug = match &cmd.changes.title {
            Some(title) => {
                let base = slugify(title);
                if base.is_empty() {
                    return Err(CatalogError::InvalidTitle(title.clone()));
                }
                let lookup = RepositorySlugs(self.classes.as_ref());
                Some(resolve_unique_slug(&base, Some(&class.id), &lookup).await?)
            }
            None => None,
        };

        class.apply(cmd.changes, self.clock.now())?;
        if let Some(slug) = new_slug {
            class.slug = slug;
        }

        self.classes.update(&class).await?;
        tracing::info!(class_id = %class.id, slug = %class.slug, "Class occurrence updated");

        Ok(class)
    }
}
