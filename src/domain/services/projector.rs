use chrono::{DateTime, Datelike, Duration, Utc};
use std::collections::HashSet;
use tracing::warn;

use crate::domain::models::availability::AvailabilityRule;
use crate::domain::models::booking::Booking;
use crate::domain::models::slot::SlotInstance;

pub const DEFAULT_HORIZON_DAYS: u16 = 14;
pub const MAX_HORIZON_DAYS: u16 = 90;

/// Expands weekly rules into concrete future instants over the horizon,
/// minus instants already held by an occupying booking. Pure: same rules,
/// bookings and clock always produce the same output.
pub fn project_slots(
    provider_id: &str,
    rules: &[AvailabilityRule],
    bookings: &[Booking],
    now: DateTime<Utc>,
    horizon_days: u16,
) -> Vec<SlotInstance> {
    let horizon_days = horizon_days.min(MAX_HORIZON_DAYS);

    // Occupied instants, minute precision. Terminally released bookings
    // (cancelled/rejected) free their slot again.
    let occupied: HashSet<i64> = bookings
        .iter()
        .filter(|b| b.status.occupies_slot())
        .map(|b| minute_key(b.start_time))
        .collect();

    let today = now.date_naive();
    let mut slots = Vec::new();

    for offset in 0..horizon_days {
        let date = today + Duration::days(offset as i64);

        for rule in rules {
            if !rule.active {
                continue;
            }
            if rule.start_time >= rule.end_time {
                warn!(rule_id = %rule.id, "skipping availability rule with inverted time window");
                continue;
            }
            let Some(rule_weekday) = rule.weekday() else {
                warn!(rule_id = %rule.id, weekday = rule.weekday, "skipping availability rule with out-of-range weekday");
                continue;
            };
            if rule_weekday != date.weekday() {
                continue;
            }

            let instant = date.and_time(rule.start_time).and_utc();
            if instant <= now {
                continue;
            }
            if occupied.contains(&minute_key(instant)) {
                continue;
            }

            slots.push(SlotInstance {
                provider_id: provider_id.to_string(),
                date,
                start_time: rule.start_time,
                end_time: rule.end_time,
                instant,
            });
        }
    }

    slots.sort_by_key(|s| s.instant);
    slots.dedup_by_key(|s| s.instant);
    slots
}

fn minute_key(t: DateTime<Utc>) -> i64 {
    t.timestamp() / 60
}
