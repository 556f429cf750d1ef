//! PostgreSQL implementation of BookingRepository.
//!
//! `bookings_payment_reference_key` makes payment references unique, and
//! `insert_if_reference_absent` leans on it with `ON CONFLICT DO NOTHING` so
//! two concurrent webhook deliveries cannot both create a booking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingStatus, GuestContact};
use crate::domain::foundation::{
    BookingId, ClassOccurrenceId, CurrencyCode, DomainError, ErrorCode, Timestamp, UserId,
};
use crate::ports::{BookingRepository, SaveResult};

const REFERENCE_CONSTRAINT: &str = "bookings_payment_reference_key";

const SELECT_COLUMNS: &str = r#"
    SELECT id, class_occurrence_id, user_id, guest_first_name, guest_last_name, guest_email,
           status, amount_paid_cents, currency, payment_reference, booked_at, updated_at
    FROM bookings
"#;

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    class_occurrence_id: Uuid,
    user_id: Option<String>,
    guest_first_name: Option<String>,
    guest_last_name: Option<String>,
    guest_email: Option<String>,
    status: String,
    amount_paid_cents: Option<i64>,
    currency: Option<String>,
    payment_reference: Option<String>,
    booked_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DomainError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let corrupt = |field: &str, e: &dyn std::fmt::Display| {
            DomainError::database(format!("Invalid {} value: {}", field, e))
        };

        let status: BookingStatus = row.status.parse().map_err(|e| corrupt("status", &e))?;
        let user_id = row
            .user_id
            .map(UserId::new)
            .transpose()
            .map_err(|e| corrupt("user_id", &e))?;
        let guest = row
            .guest_email
            .map(|email| {
                GuestContact::new(
                    row.guest_first_name.unwrap_or_default(),
                    row.guest_last_name.unwrap_or_default(),
                    email,
                )
            })
            .transpose()
            .map_err(|e| corrupt("guest_email", &e))?;
        let currency = row
            .currency
            .map(CurrencyCode::new)
            .transpose()
            .map_err(|e| corrupt("currency", &e))?;

        Ok(Booking {
            id: BookingId::from_uuid(row.id),
            class_occurrence_id: ClassOccurrenceId::from_uuid(row.class_occurrence_id),
            user_id,
            guest,
            status,
            amount_paid_cents: row.amount_paid_cents,
            currency,
            payment_reference: row.payment_reference,
            booked_at: Timestamp::from_datetime(row.booked_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn write_error(action: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.constraint() == Some(REFERENCE_CONSTRAINT) {
            return DomainError::new(ErrorCode::Conflict, "Payment reference already recorded");
        }
    }
    DomainError::database(format!("Failed to {} booking: {}", action, e))
}

const INSERT: &str = r#"
    INSERT INTO bookings (
        id, class_occurrence_id, user_id, guest_first_name, guest_last_name, guest_email,
        status, amount_paid_cents, currency, payment_reference, booked_at, updated_at
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
"#;

fn bind_insert<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    booking: &'q Booking,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    let guest = booking.guest.as_ref();
    query
        .bind(booking.id.as_uuid())
        .bind(booking.class_occurrence_id.as_uuid())
        .bind(booking.user_id.as_ref().map(|u| u.as_str()))
        .bind(guest.map(|g| g.first_name.as_str()))
        .bind(guest.map(|g| g.last_name.as_str()))
        .bind(guest.map(|g| g.email.as_str()))
        .bind(booking.status.as_str())
        .bind(booking.amount_paid_cents)
        .bind(booking.currency.as_ref().map(|c| c.as_str()))
        .bind(&booking.payment_reference)
        .bind(booking.booked_at.as_datetime())
        .bind(booking.updated_at.as_datetime())
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        bind_insert(sqlx::query(INSERT), booking)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("save", e))?;

        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                status = $2,
                amount_paid_cents = $3,
                currency = $4,
                payment_reference = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.status.as_str())
        .bind(booking.amount_paid_cents)
        .bind(booking.currency.as_ref().map(|c| c.as_str()))
        .bind(&booking.payment_reference)
        .bind(booking.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::BookingNotFound, "Booking not found"));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find booking: {}", e)))?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_by_payment_reference(&self, reference: &str) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("{} WHERE payment_reference = $1", SELECT_COLUMNS))
                .bind(reference)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to find booking: {}", e)))?;

        row.map(Booking::try_from).transpose()
    }

    async fn insert_if_reference_absent(&self, booking: &Booking) -> Result<SaveResult, DomainError> {
        if booking.payment_reference.is_none() {
            return Err(DomainError::validation(
                "payment_reference",
                "Paid bookings need a payment reference",
            ));
        }

        let sql = format!("{} ON CONFLICT (payment_reference) DO NOTHING", INSERT);
        let result = bind_insert(sqlx::query(&sql), booking)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("save", e))?;

        if result.rows_affected() == 0 {
            Ok(SaveResult::AlreadyExists)
        } else {
            Ok(SaveResult::Inserted)
        }
    }

    async fn count_holding_spots(&self, class_id: &ClassOccurrenceId) -> Result<u32, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE class_occurrence_id = $1 AND status IN ('pending', 'confirmed')
            "#,
        )
        .bind(class_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to count bookings: {}", e)))?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}
