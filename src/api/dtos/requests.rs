use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One weekly window in a rule-set replacement. Weekday is the day name
/// ("MONDAY".."SUNDAY"); times are "HH:MM"; active defaults to true.
#[derive(Deserialize)]
pub struct RuleSpec {
    pub weekday: String,
    pub start: String,
    pub end: String,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub provider_id: String,
    pub subject_ref: Option<String>,
    pub start_time: DateTime<Utc>,
    pub duration_min: i32,
    pub price_cents: i64,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub horizon_days: Option<u16>,
}
