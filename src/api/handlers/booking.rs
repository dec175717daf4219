use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, NaiveTime, Timelike, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::{requests::CreateBookingRequest, responses::BookingResponse};
use crate::api::extractors::actor::AuthActor;
use crate::domain::models::actor::Role;
use crate::domain::models::booking::{Booking, NewBookingParams};
use crate::domain::services::projector::{project_slots, MAX_HORIZON_DAYS};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if actor.role != Role::Requester {
        return Err(AppError::Forbidden(
            "Only requesters may create bookings".into(),
        ));
    }
    if payload.duration_min <= 0 {
        return Err(AppError::Validation("Duration must be positive".into()));
    }
    if payload.price_cents < 0 {
        return Err(AppError::Validation("Price must not be negative".into()));
    }

    let now = Utc::now();
    let start_time = payload.start_time;

    if start_time <= now {
        return Err(AppError::Validation("Cannot book in the past".into()));
    }
    if start_time.second() != 0 || start_time.nanosecond() != 0 {
        return Err(AppError::Validation(
            "Booking time must align to whole minutes".into(),
        ));
    }

    let window_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let window_end = window_start + Duration::days(MAX_HORIZON_DAYS as i64);
    if start_time >= window_end {
        return Err(AppError::Validation(
            "Booking time is beyond the booking horizon".into(),
        ));
    }

    // The slot must currently project as open. This read is advisory; the
    // unique index on (provider_id, start_time) stays the authoritative
    // guard once concurrent requests reach the insert.
    let rules = state.availability_repo.list_rules(&payload.provider_id).await?;
    let occupied = state
        .booking_repo
        .list_occupied_in_window(&payload.provider_id, window_start, window_end)
        .await?;
    let open = project_slots(&payload.provider_id, &rules, &occupied, now, MAX_HORIZON_DAYS);

    if !open.iter().any(|s| s.instant == start_time) {
        warn!(
            "Booking rejected: slot {} not open for provider {}",
            start_time.to_rfc3339(),
            payload.provider_id
        );
        return Err(AppError::Conflict(
            "Selected time slot is not available".into(),
        ));
    }

    let booking = Booking::new(NewBookingParams {
        provider_id: payload.provider_id,
        requester_id: actor.id,
        subject_ref: payload.subject_ref,
        start: start_time,
        duration_min: payload.duration_min,
        price_cents: payload.price_cents,
    });

    let created = state.booking_repo.create(&booking).await?;
    info!(
        "Booking created: {} for provider {} at {}",
        created.id,
        created.provider_id,
        created.start_time.to_rfc3339()
    );

    // Fire and forget: a messaging failure never fails the booking.
    let notifier = state.notifier.clone();
    let for_notify = created.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.booking_created(&for_notify).await {
            warn!(
                "booking.created notification failed for {}: {}",
                for_notify.id, e
            );
        }
    });

    Ok(Json(BookingResponse::from_booking(&created, now)))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> Result<impl IntoResponse, AppError> {
    let bookings = match actor.role {
        Role::Provider => state.booking_repo.list_by_provider(&actor.id).await?,
        Role::Requester => state.booking_repo.list_by_requester(&actor.id).await?,
    };

    let now = Utc::now();
    let items: Vec<BookingResponse> = bookings
        .iter()
        .map(|b| BookingResponse::from_booking(b, now))
        .collect();
    Ok(Json(items))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(&booking_id)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if actor.id != booking.provider_id && actor.id != booking.requester_id {
        return Err(AppError::Forbidden("Not a party to this booking".into()));
    }

    Ok(Json(BookingResponse::from_booking(&booking, Utc::now())))
}
