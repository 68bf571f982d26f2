use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use safari_core::repository::BookingRepository;
use safari_core::{
    Booking, BookingStatus, CartItem, CustomerInfo, GuestInfo, ListQuery, Page, RepositoryError,
    RepositoryResult,
};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::db_error;
use crate::listing::ListSpec;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    booking_reference: String,
    customer_info: Json<CustomerInfo>,
    guests: Json<Vec<GuestInfo>>,
    items: Json<Vec<CartItem>>,
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = RepositoryError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<BookingStatus>()
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;
        Ok(Booking {
            id: row.id,
            booking_reference: row.booking_reference,
            customer_info: row.customer_info.0,
            guests: row.guests.0,
            items: row.items.0,
            subtotal: row.subtotal,
            tax: row.tax,
            total: row.total,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const BOOKING_COLUMNS: &str =
    "id, booking_reference, customer_info, guests, items, subtotal, tax, total, status, created_at, updated_at";

const BOOKING_LIST: ListSpec = ListSpec {
    table: "bookings",
    columns: BOOKING_COLUMNS,
    search_columns: &["booking_reference", "customer_name", "customer_email"],
    status_column: Some("status"),
    role_column: None,
    sortable: &["created_at", "total", "booking_reference", "customer_name", "status"],
    default_sort: "created_at",
};

/// Writes only while the stored status is still `expected`.
async fn compare_and_set<'e, E>(
    executor: E,
    id: Uuid,
    expected: BookingStatus,
    next: BookingStatus,
) -> RepositoryResult<Booking>
where
    E: sqlx::PgExecutor<'e>,
{
    let sql = format!(
        "UPDATE bookings SET status = $1, updated_at = NOW() WHERE id = $2 AND status = $3 RETURNING {}",
        BOOKING_COLUMNS
    );
    let row: Option<BookingRow> = sqlx::query_as(&sql)
        .bind(next.as_str())
        .bind(id)
        .bind(expected.as_str())
        .fetch_optional(executor)
        .await
        .map_err(db_error)?;

    row.ok_or_else(|| stale_status(id, expected))?.try_into()
}

pub(crate) fn stale_status(id: Uuid, expected: BookingStatus) -> RepositoryError {
    RepositoryError::Conflict(format!("Booking {} is no longer {}", id, expected))
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_booking(&self, booking: &Booking) -> RepositoryResult<Booking> {
        let row: BookingRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO bookings (id, booking_reference, customer_name, customer_email, customer_info, guests, items, subtotal, tax, total, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(booking.id)
        .bind(&booking.booking_reference)
        .bind(&booking.customer_info.name)
        .bind(&booking.customer_info.email)
        .bind(Json(&booking.customer_info))
        .bind(Json(&booking.guests))
        .bind(Json(&booking.items))
        .bind(booking.subtotal)
        .bind(booking.tax)
        .bind(booking.total)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        row.try_into()
    }

    async fn get_booking(&self, id: Uuid) -> RepositoryResult<Option<Booking>> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(Booking::try_from).transpose()
    }

    async fn list_bookings(&self, query: &ListQuery) -> RepositoryResult<Page<Booking>> {
        let (rows, total) = BOOKING_LIST.fetch_page::<BookingRow>(&self.pool, query).await?;
        let items = rows
            .into_iter()
            .map(Booking::try_from)
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(Page::new(items, query, total))
    }

    async fn update_status(&self, id: Uuid, expected: BookingStatus, next: BookingStatus) -> RepositoryResult<Booking> {
        compare_and_set(&self.pool, id, expected, next).await
    }

    async fn update_statuses(
        &self,
        changes: &[(Uuid, BookingStatus)],
        next: BookingStatus,
    ) -> RepositoryResult<Vec<Booking>> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let mut updated = Vec::with_capacity(changes.len());
        for (id, expected) in changes {
            updated.push(compare_and_set(&mut *tx, *id, *expected, next).await?);
        }
        tx.commit().await.map_err(db_error)?;
        Ok(updated)
    }

    async fn delete_booking(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Booking", id));
        }
        Ok(())
    }
}
