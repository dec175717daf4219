use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Stored lifecycle states. COMPLETED is never written to the database;
/// it is derived at read time, see [`Booking::effective_status`].
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    /// A booking keeps its slot reserved until it is rejected or cancelled.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, BookingStatus::Rejected | BookingStatus::Cancelled)
    }
}

/// What callers see: the stored status, except that an approved booking
/// whose end lies in the past reads as COMPLETED.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum EffectiveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Completed,
}

impl From<BookingStatus> for EffectiveStatus {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Pending => EffectiveStatus::Pending,
            BookingStatus::Approved => EffectiveStatus::Approved,
            BookingStatus::Rejected => EffectiveStatus::Rejected,
            BookingStatus::Cancelled => EffectiveStatus::Cancelled,
        }
    }
}

impl fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EffectiveStatus::Pending => "PENDING",
            EffectiveStatus::Approved => "APPROVED",
            EffectiveStatus::Rejected => "REJECTED",
            EffectiveStatus::Cancelled => "CANCELLED",
            EffectiveStatus::Completed => "COMPLETED",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub provider_id: String,
    pub requester_id: String,
    pub subject_ref: Option<String>,
    pub start_time: DateTime<Utc>,
    pub duration_min: i32,
    pub price_cents: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub provider_id: String,
    pub requester_id: String,
    pub subject_ref: Option<String>,
    pub start: DateTime<Utc>,
    pub duration_min: i32,
    pub price_cents: i64,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider_id: params.provider_id,
            requester_id: params.requester_id,
            subject_ref: params.subject_ref,
            start_time: params.start,
            duration_min: params.duration_min,
            price_cents: params.price_cents,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::minutes(self.duration_min as i64)
    }

    pub fn effective_status(&self, now: DateTime<Utc>) -> EffectiveStatus {
        if self.status == BookingStatus::Approved && self.end_time() < now {
            EffectiveStatus::Completed
        } else {
            self.status.into()
        }
    }
}
