use chrono::{DateTime, Utc};

use crate::domain::models::actor::Actor;
use crate::domain::models::booking::{Booking, BookingStatus, EffectiveStatus};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Approve,
    Reject,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequiredParty {
    Provider,
    Requester,
    Either,
}

/// The guard to hand to the store: update succeeds only while the row
/// still carries `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedTransition {
    pub from: BookingStatus,
    pub to: BookingStatus,
}

// The whole transition table. Matched without a wildcard so a new status
// variant forces this to be revisited.
fn transition_rule(
    from: BookingStatus,
    action: LifecycleAction,
) -> Option<(BookingStatus, RequiredParty)> {
    match (from, action) {
        (BookingStatus::Pending, LifecycleAction::Approve) => {
            Some((BookingStatus::Approved, RequiredParty::Provider))
        }
        (BookingStatus::Pending, LifecycleAction::Reject) => {
            Some((BookingStatus::Rejected, RequiredParty::Provider))
        }
        (BookingStatus::Pending, LifecycleAction::Cancel) => {
            Some((BookingStatus::Cancelled, RequiredParty::Requester))
        }
        (BookingStatus::Approved, LifecycleAction::Cancel) => {
            Some((BookingStatus::Cancelled, RequiredParty::Either))
        }
        (BookingStatus::Approved, LifecycleAction::Approve | LifecycleAction::Reject) => None,
        (BookingStatus::Rejected | BookingStatus::Cancelled, _) => None,
    }
}

/// Decides whether `actor` may apply `action` to `booking` right now.
/// Outsiders are turned away before any state is disclosed; an approved
/// booking whose end has passed reads as COMPLETED and accepts nothing.
pub fn plan_transition(
    booking: &Booking,
    action: LifecycleAction,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<PlannedTransition, AppError> {
    let is_provider = actor.id == booking.provider_id;
    let is_requester = actor.id == booking.requester_id;

    if !is_provider && !is_requester {
        return Err(AppError::Forbidden(
            "Not a party to this booking".to_string(),
        ));
    }

    let effective = booking.effective_status(now);
    if effective == EffectiveStatus::Completed {
        return Err(AppError::InvalidState { current: effective });
    }

    let Some((to, required)) = transition_rule(booking.status, action) else {
        return Err(AppError::InvalidState { current: effective });
    };

    let allowed = match required {
        RequiredParty::Provider => is_provider,
        RequiredParty::Requester => is_requester,
        RequiredParty::Either => true,
    };
    if !allowed {
        let message = match action {
            LifecycleAction::Approve => "Only the provider may approve a booking",
            LifecycleAction::Reject => "Only the provider may reject a booking",
            LifecycleAction::Cancel => "Only the requester may cancel a pending booking",
        };
        return Err(AppError::Forbidden(message.to_string()));
    }

    Ok(PlannedTransition {
        from: booking.status,
        to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::actor::Role;
    use crate::domain::models::booking::NewBookingParams;
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
    }

    fn booking_with(status: BookingStatus) -> Booking {
        let mut booking = Booking::new(NewBookingParams {
            provider_id: "prov-1".to_string(),
            requester_id: "req-1".to_string(),
            subject_ref: Some("algebra".to_string()),
            start: fixed_now() + Duration::days(3),
            duration_min: 60,
            price_cents: 2500,
        });
        booking.status = status;
        booking
    }

    fn provider() -> Actor {
        Actor {
            id: "prov-1".to_string(),
            role: Role::Provider,
        }
    }

    fn requester() -> Actor {
        Actor {
            id: "req-1".to_string(),
            role: Role::Requester,
        }
    }

    fn stranger() -> Actor {
        Actor {
            id: "someone-else".to_string(),
            role: Role::Requester,
        }
    }

    #[test]
    fn provider_approves_pending() {
        let booking = booking_with(BookingStatus::Pending);
        let planned =
            plan_transition(&booking, LifecycleAction::Approve, &provider(), fixed_now()).unwrap();
        assert_eq!(planned.from, BookingStatus::Pending);
        assert_eq!(planned.to, BookingStatus::Approved);
    }

    #[test]
    fn provider_rejects_pending() {
        let booking = booking_with(BookingStatus::Pending);
        let planned =
            plan_transition(&booking, LifecycleAction::Reject, &provider(), fixed_now()).unwrap();
        assert_eq!(planned.to, BookingStatus::Rejected);
    }

    #[test]
    fn requester_withdraws_pending() {
        let booking = booking_with(BookingStatus::Pending);
        let planned =
            plan_transition(&booking, LifecycleAction::Cancel, &requester(), fixed_now()).unwrap();
        assert_eq!(planned.to, BookingStatus::Cancelled);
    }

    #[test]
    fn either_party_cancels_approved() {
        let booking = booking_with(BookingStatus::Approved);
        for actor in [provider(), requester()] {
            let planned =
                plan_transition(&booking, LifecycleAction::Cancel, &actor, fixed_now()).unwrap();
            assert_eq!(planned.from, BookingStatus::Approved);
            assert_eq!(planned.to, BookingStatus::Cancelled);
        }
    }

    #[test]
    fn requester_cannot_approve_or_reject() {
        let booking = booking_with(BookingStatus::Pending);
        for action in [LifecycleAction::Approve, LifecycleAction::Reject] {
            let err = plan_transition(&booking, action, &requester(), fixed_now()).unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)), "got {err:?}");
        }
    }

    #[test]
    fn provider_cannot_withdraw_pending() {
        let booking = booking_with(BookingStatus::Pending);
        let err =
            plan_transition(&booking, LifecycleAction::Cancel, &provider(), fixed_now()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn stranger_is_turned_away_regardless_of_state() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Approved,
            BookingStatus::Rejected,
            BookingStatus::Cancelled,
        ] {
            let booking = booking_with(status);
            for action in [
                LifecycleAction::Approve,
                LifecycleAction::Reject,
                LifecycleAction::Cancel,
            ] {
                let err = plan_transition(&booking, action, &stranger(), fixed_now()).unwrap_err();
                assert!(matches!(err, AppError::Forbidden(_)), "got {err:?}");
            }
        }
    }

    #[test]
    fn approved_cannot_be_approved_or_rejected_again() {
        let booking = booking_with(BookingStatus::Approved);
        for action in [LifecycleAction::Approve, LifecycleAction::Reject] {
            let err = plan_transition(&booking, action, &provider(), fixed_now()).unwrap_err();
            assert!(matches!(
                err,
                AppError::InvalidState {
                    current: EffectiveStatus::Approved
                }
            ));
        }
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for status in [BookingStatus::Rejected, BookingStatus::Cancelled] {
            let booking = booking_with(status);
            for action in [
                LifecycleAction::Approve,
                LifecycleAction::Reject,
                LifecycleAction::Cancel,
            ] {
                let err = plan_transition(&booking, action, &provider(), fixed_now()).unwrap_err();
                assert!(matches!(err, AppError::InvalidState { .. }), "got {err:?}");
            }
        }
    }

    #[test]
    fn completed_booking_rejects_cancellation() {
        let mut booking = booking_with(BookingStatus::Approved);
        booking.start_time = fixed_now() - Duration::days(1);

        let err =
            plan_transition(&booking, LifecycleAction::Cancel, &requester(), fixed_now()).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidState {
                current: EffectiveStatus::Completed
            }
        ));
    }
}
