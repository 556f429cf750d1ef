//! ListClassesHandler - Query handler for the class schedule.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::catalog::{CatalogError, ClassOccurrence};
use crate::domain::foundation::ValidationError;
use crate::ports::{ClassListFilter, ClassOccurrenceRepository};

/// Query for classes in a date range. Both bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ListClassesQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub include_inactive: bool,
}

pub struct ListClassesHandler {
    classes: Arc<dyn ClassOccurrenceRepository>,
}

impl ListClassesHandler {
    pub fn new(classes: Arc<dyn ClassOccurrenceRepository>) -> Self {
        Self { classes }
    }

    /// Classes ordered by date, then start time.
    pub async fn handle(&self, query: ListClassesQuery) -> Result<Vec<ClassOccurrence>, CatalogError> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if end < start {
                return Err(ValidationError::invalid_format(
                    "endDate",
                    "must not be before startDate",
                )
                .into());
            }
        }

        let filter = ClassListFilter {
            start_date: query.start_date,
            end_date: query.end_date,
            include_inactive: query.include_inactive,
        };
        Ok(self.classes.list(&filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryClassOccurrenceRepository;
    use crate::domain::catalog::fixtures::class_on;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    async fn seeded() -> ListClassesHandler {
        let repo = Arc::new(InMemoryClassOccurrenceRepository::new());
        for (i, d) in [12, 3, 7].into_iter().enumerate() {
            let mut class = class_on(date(d));
            class.slug = format!("class-{}", i);
            repo.save(&class).await.unwrap();
        }
        let mut hidden = class_on(date(5));
        hidden.slug = "hidden".to_string();
        hidden.is_active = false;
        repo.save(&hidden).await.unwrap();
        ListClassesHandler::new(repo)
    }

    #[tokio::test]
    async fn lists_active_classes_in_date_order() {
        let handler = seeded().await;

        let classes = handler.handle(ListClassesQuery::default()).await.unwrap();

        let dates: Vec<_> = classes.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![date(3), date(7), date(12)]);
    }

    #[tokio::test]
    async fn range_is_inclusive_and_can_include_inactive() {
        let handler = seeded().await;

        let classes = handler
            .handle(ListClassesQuery {
                start_date: Some(date(3)),
                end_date: Some(date(7)),
                include_inactive: true,
            })
            .await
            .unwrap();

        let dates: Vec<_> = classes.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![date(3), date(5), date(7)]);
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let handler = seeded().await;

        let result = handler
            .handle(ListClassesQuery {
                start_date: Some(date(10)),
                end_date: Some(date(1)),
                include_inactive: false,
            })
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }
}
