use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One weekly recurring window. Weekday follows ISO-8601 numbering
/// (1 = Monday .. 7 = Sunday); times are naive wall-clock, minute precision.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AvailabilityRule {
    pub id: String,
    pub provider_id: String,
    pub weekday: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl AvailabilityRule {
    pub fn new(
        provider_id: String,
        weekday: i32,
        start_time: NaiveTime,
        end_time: NaiveTime,
        active: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider_id,
            weekday,
            start_time,
            end_time,
            active,
            created_at: Utc::now(),
        }
    }

    /// None when the stored weekday is outside 1..=7.
    pub fn weekday(&self) -> Option<Weekday> {
        match self.weekday {
            1 => Some(Weekday::Mon),
            2 => Some(Weekday::Tue),
            3 => Some(Weekday::Wed),
            4 => Some(Weekday::Thu),
            5 => Some(Weekday::Fri),
            6 => Some(Weekday::Sat),
            7 => Some(Weekday::Sun),
            _ => None,
        }
    }
}
