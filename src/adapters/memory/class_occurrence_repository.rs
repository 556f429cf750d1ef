//! In-memory class catalog.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::catalog::ClassOccurrence;
use crate::domain::foundation::{ClassOccurrenceId, DomainError, ErrorCode};
use crate::ports::{ClassListFilter, ClassOccurrenceRepository};

#[derive(Debug, Clone, Default)]
pub struct InMemoryClassOccurrenceRepository {
    classes: Arc<RwLock<HashMap<ClassOccurrenceId, ClassOccurrence>>>,
}

impl InMemoryClassOccurrenceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.classes.read().await.len()
    }
}

fn slug_taken(
    classes: &HashMap<ClassOccurrenceId, ClassOccurrence>,
    slug: &str,
    except: &ClassOccurrenceId,
) -> bool {
    classes.values().any(|c| c.slug == slug && c.id != *except)
}

#[async_trait]
impl ClassOccurrenceRepository for InMemoryClassOccurrenceRepository {
    async fn save(&self, class: &ClassOccurrence) -> Result<(), DomainError> {
        let mut classes = self.classes.write().await;
        if classes.contains_key(&class.id) {
            return Err(DomainError::new(ErrorCode::Conflict, "Class occurrence already exists"));
        }
        if slug_taken(&classes, &class.slug, &class.id) {
            return Err(DomainError::new(ErrorCode::Conflict, "Slug already in use")
                .with_detail("slug", class.slug.clone()));
        }
        classes.insert(class.id, class.clone());
        Ok(())
    }

    async fn update(&self, class: &ClassOccurrence) -> Result<(), DomainError> {
        let mut classes = self.classes.write().await;
        if !classes.contains_key(&class.id) {
            return Err(DomainError::new(ErrorCode::ClassNotFound, "Class occurrence not found"));
        }
        if slug_taken(&classes, &class.slug, &class.id) {
            return Err(DomainError::new(ErrorCode::Conflict, "Slug already in use")
                .with_detail("slug", class.slug.clone()));
        }
        classes.insert(class.id, class.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ClassOccurrenceId) -> Result<Option<ClassOccurrence>, DomainError> {
        Ok(self.classes.read().await.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ClassOccurrence>, DomainError> {
        Ok(self
            .classes
            .read()
            .await
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn list(&self, filter: &ClassListFilter) -> Result<Vec<ClassOccurrence>, DomainError> {
        let mut found: Vec<ClassOccurrence> = self
            .classes
            .read()
            .await
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
        Ok(found)
    }
}
