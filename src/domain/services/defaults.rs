use chrono::NaiveTime;

use crate::domain::models::availability::AvailabilityRule;

/// Onboarding template: Monday through Friday, one-hour windows from
/// 09:00 to 18:00. Applied through the normal replace path.
pub fn standard_week_rules(provider_id: &str) -> Vec<AvailabilityRule> {
    let mut rules = Vec::new();
    for weekday in 1..=5 {
        for hour in 9u32..18 {
            if let (Some(start), Some(end)) = (
                NaiveTime::from_hms_opt(hour, 0, 0),
                NaiveTime::from_hms_opt(hour + 1, 0, 0),
            ) {
                rules.push(AvailabilityRule::new(
                    provider_id.to_string(),
                    weekday,
                    start,
                    end,
                    true,
                ));
            }
        }
    }
    rules
}
