use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use common::BookingId;
use domain::{Booking, BookingStatus, ResourceId, UserId};

use crate::{
    error::{Result, StoreError},
    store::BookingStore,
};

/// PostgreSQL-backed booking store implementation.
#[derive(Clone)]
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    /// Creates a new PostgreSQL booking store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_booking(row: PgRow) -> Result<Booking> {
        let status_str: String = row.try_get("status")?;
        let status = status_str
            .parse::<BookingStatus>()
            .map_err(|_| StoreError::InvalidStatus(status_str))?;

        Ok(Booking {
            id: BookingId::from_uuid(row.try_get::<Uuid, _>("id")?),
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            resource_id: ResourceId::from_uuid(row.try_get::<Uuid, _>("resource_id")?),
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            status,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl BookingStore for PostgresBookingStore {
    async fn create_booking(&self, booking: &Booking) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, user_id, resource_id, start_time, end_time, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.user_id.as_uuid())
        .bind(booking.resource_id.as_uuid())
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::AlreadyExists(booking.id);
            }
            StoreError::Database(e)
        })?;

        tracing::debug!(booking_id = %booking.id, "booking row inserted");
        Ok(())
    }

    async fn get_booking(&self, id: BookingId) -> Result<Booking> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, resource_id, start_time, end_time, status, created_at, updated_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?;

        Self::row_to_booking(row)
    }

    async fn update_booking_status(&self, id: BookingId, status: BookingStatus) -> Result<()> {
        let result = sqlx::query("UPDATE bookings SET status = $1, updated_at = now() WHERE id = $2")
            .bind(status.as_str())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        tracing::debug!(booking_id = %id, status = %status, "booking status updated");
        Ok(())
    }
}
