use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::booking::{Booking, EffectiveStatus};
use crate::domain::models::slot::SlotInstance;

#[derive(Serialize)]
pub struct SlotsResponse {
    pub provider_id: String,
    pub horizon_days: u16,
    pub slots: Vec<SlotInstance>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub provider_id: String,
    pub requester_id: String,
    pub subject_ref: Option<String>,
    pub start_time: DateTime<Utc>,
    pub duration_min: i32,
    pub price_cents: i64,
    pub status: EffectiveStatus,
    pub created_at: DateTime<Utc>,
}

impl BookingResponse {
    /// Callers see the effective status: an approved booking whose end has
    /// passed reads as COMPLETED.
    pub fn from_booking(booking: &Booking, now: DateTime<Utc>) -> Self {
        Self {
            id: booking.id.clone(),
            provider_id: booking.provider_id.clone(),
            requester_id: booking.requester_id.clone(),
            subject_ref: booking.subject_ref.clone(),
            start_time: booking.start_time,
            duration_min: booking.duration_min,
            price_cents: booking.price_cents,
            status: booking.effective_status(now),
            created_at: booking.created_at,
        }
    }
}
