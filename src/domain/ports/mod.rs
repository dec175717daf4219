use crate::domain::models::{
    availability::AvailabilityRule,
    booking::{Booking, BookingStatus},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Rules for a provider, ordered by weekday then start time.
    async fn list_rules(&self, provider_id: &str) -> Result<Vec<AvailabilityRule>, AppError>;
    /// Atomically swaps the provider's entire rule set for `rules`.
    async fn replace_rules(
        &self,
        provider_id: &str,
        rules: &[AvailabilityRule],
    ) -> Result<Vec<AvailabilityRule>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking. The store enforces that at most one occupying
    /// booking exists per (provider_id, start_time); losing that race
    /// surfaces as `AppError::Conflict`.
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_requester(&self, requester_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<Booking>, AppError>;
    /// Occupying bookings (status still holding the slot) with
    /// `start <= start_time < end`.
    async fn list_occupied_in_window(
        &self,
        provider_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Booking>, AppError>;
    /// Single guarded update: succeeds only if the row still carries `from`.
    /// Returns `None` when the guard misses (row gone or status moved on).
    async fn transition_status(
        &self,
        id: &str,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>, AppError>;
}

#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn booking_created(&self, booking: &Booking) -> Result<(), AppError>;
}
