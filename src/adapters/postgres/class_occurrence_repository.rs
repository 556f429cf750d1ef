//! PostgreSQL implementation of ClassOccurrenceRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::catalog::ClassOccurrence;
use crate::domain::foundation::{ClassOccurrenceId, DomainError, ErrorCode, Timestamp};
use crate::ports::{ClassListFilter, ClassOccurrenceRepository};

const SLUG_CONSTRAINT: &str = "class_occurrences_slug_key";

const SELECT_COLUMNS: &str = r#"
    SELECT id, title, slug, description, date, start_time, end_time, duration_minutes,
           price_pence, location, instructor, level, max_capacity, is_active,
           created_at, updated_at
    FROM class_occurrences
"#;

pub struct PostgresClassOccurrenceRepository {
    pool: PgPool,
}

impl PostgresClassOccurrenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClassOccurrenceRow {
    id: Uuid,
    title: String,
    slug: String,
    description: Option<String>,
    date: NaiveDate,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    duration_minutes: Option<i32>,
    price_pence: i64,
    location: Option<String>,
    instructor: Option<String>,
    level: Option<String>,
    max_capacity: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ClassOccurrenceRow> for ClassOccurrence {
    type Error = DomainError;

    fn try_from(row: ClassOccurrenceRow) -> Result<Self, Self::Error> {
        let max_capacity = u32::try_from(row.max_capacity).map_err(|_| {
            DomainError::database(format!("Invalid max_capacity value: {}", row.max_capacity))
        })?;

        Ok(ClassOccurrence {
            id: ClassOccurrenceId::from_uuid(row.id),
            title: row.title,
            slug: row.slug,
            description: row.description,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            duration_minutes: row.duration_minutes.and_then(|m| u32::try_from(m).ok()),
            price_pence: row.price_pence,
            location: row.location,
            instructor: row.instructor,
            level: row.level,
            max_capacity,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn write_error(action: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.constraint() == Some(SLUG_CONSTRAINT) {
            return DomainError::new(ErrorCode::Conflict, "Slug already in use");
        }
    }
    DomainError::database(format!("Failed to {} class occurrence: {}", action, e))
}

fn capacity_column(class: &ClassOccurrence) -> i32 {
    i32::try_from(class.max_capacity).unwrap_or(i32::MAX)
}

#[async_trait]
impl ClassOccurrenceRepository for PostgresClassOccurrenceRepository {
    async fn save(&self, class: &ClassOccurrence) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO class_occurrences (
                id, title, slug, description, date, start_time, end_time, duration_minutes,
                price_pence, location, instructor, level, max_capacity, is_active,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(class.id.as_uuid())
        .bind(&class.title)
        .bind(&class.slug)
        .bind(&class.description)
        .bind(class.date)
        .bind(class.start_time)
        .bind(class.end_time)
        .bind(class.duration_minutes.map(|m| m as i32))
        .bind(class.price_pence)
        .bind(&class.location)
        .bind(&class.instructor)
        .bind(&class.level)
        .bind(capacity_column(class))
        .bind(class.is_active)
        .bind(class.created_at.as_datetime())
        .bind(class.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("save", e))?;

        Ok(())
    }

    async fn update(&self, class: &ClassOccurrence) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE class_occurrences SET
                title = $2,
                slug = $3,
                description = $4,
                date = $5,
                start_time = $6,
                end_time = $7,
                duration_minutes = $8,
                price_pence = $9,
                location = $10,
                instructor = $11,
                level = $12,
                max_capacity = $13,
                is_active = $14,
                updated_at = $15
            WHERE id = $1
            "#,
        )
        .bind(class.id.as_uuid())
        .bind(&class.title)
        .bind(&class.slug)
        .bind(&class.description)
        .bind(class.date)
        .bind(class.start_time)
        .bind(class.end_time)
        .bind(class.duration_minutes.map(|m| m as i32))
        .bind(class.price_pence)
        .bind(&class.location)
        .bind(&class.instructor)
        .bind(&class.level)
        .bind(capacity_column(class))
        .bind(class.is_active)
        .bind(class.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ClassNotFound,
                "Class occurrence not found",
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &ClassOccurrenceId) -> Result<Option<ClassOccurrence>, DomainError> {
        let row: Option<ClassOccurrenceRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::database(format!("Failed to find class occurrence: {}", e))
                })?;

        row.map(ClassOccurrence::try_from).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ClassOccurrence>, DomainError> {
        let row: Option<ClassOccurrenceRow> =
            sqlx::query_as(&format!("{} WHERE slug = $1", SELECT_COLUMNS))
                .bind(slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::database(format!("Failed to find class occurrence: {}", e))
                })?;

        row.map(ClassOccurrence::try_from).transpose()
    }

    async fn list(&self, filter: &ClassListFilter) -> Result<Vec<ClassOccurrence>, DomainError> {
        let rows: Vec<ClassOccurrenceRow> = sqlx::query_as(&format!(
            r#"{}
            WHERE ($1::date IS NULL OR date >= $1)
              AND ($2::date IS NULL OR date <= $2)
              AND ($3 OR is_active)
            ORDER BY date ASC, start_time ASC NULLS FIRST
            "#,
            SELECT_COLUMNS
        ))
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list class occurrences: {}", e)))?;

        rows.into_iter().map(ClassOccurrence::try_from).collect()
    }
}
