use crate::domain::{
    models::booking::{Booking, BookingStatus},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        // The partial unique index on (provider_id, start_time) over occupying
        // statuses arbitrates concurrent attempts on the same slot.
        sqlx::query_as::<_, Booking>("INSERT INTO bookings (id, provider_id, requester_id, subject_ref, start_time, duration_min, price_cents, status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *")
            .bind(&booking.id).bind(&booking.provider_id).bind(&booking.requester_id).bind(&booking.subject_ref)
            .bind(booking.start_time).bind(booking.duration_min).bind(booking.price_cents).bind(booking.status)
            .bind(booking.created_at)
            .fetch_one(&self.pool).await
            .map_err(|e| {
                if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                    AppError::Conflict("slot already booked".to_string())
                } else {
                    AppError::Database(e)
                }
            })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_requester(&self, requester_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE requester_id = $1 ORDER BY start_time DESC")
            .bind(requester_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE provider_id = $1 ORDER BY start_time DESC")
            .bind(provider_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_occupied_in_window(
        &self,
        provider_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE provider_id = $1 AND start_time >= $2 AND start_time < $3 AND status NOT IN ('CANCELLED', 'REJECTED')")
            .bind(provider_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn transition_status(
        &self,
        id: &str,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>, AppError> {
        // Optimistic guard: only one of two racing transitions can find the
        // row still in `from`.
        sqlx::query_as::<_, Booking>("UPDATE bookings SET status = $1 WHERE id = $2 AND status = $3 RETURNING *")
            .bind(to)
            .bind(id)
            .bind(from)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
