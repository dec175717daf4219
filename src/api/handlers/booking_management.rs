use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::responses::BookingResponse;
use crate::api::extractors::actor::AuthActor;
use crate::domain::models::actor::Actor;
use crate::domain::services::lifecycle::{plan_transition, LifecycleAction};
use crate::error::AppError;
use crate::state::AppState;

pub async fn approve_booking(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let response = apply_transition(&state, &actor, &booking_id, LifecycleAction::Approve).await?;
    Ok(Json(response))
}

pub async fn reject_booking(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let response = apply_transition(&state, &actor, &booking_id, LifecycleAction::Reject).await?;
    Ok(Json(response))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let response = apply_transition(&state, &actor, &booking_id, LifecycleAction::Cancel).await?;
    Ok(Json(response))
}

async fn apply_transition(
    state: &AppState,
    actor: &Actor,
    booking_id: &str,
    action: LifecycleAction,
) -> Result<BookingResponse, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(booking_id)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let now = Utc::now();
    let planned = plan_transition(&booking, action, actor, now)?;

    match state
        .booking_repo
        .transition_status(booking_id, planned.from, planned.to)
        .await?
    {
        Some(updated) => {
            info!(
                "Booking {} moved {:?} -> {:?} by {}",
                updated.id, planned.from, planned.to, actor.id
            );
            Ok(BookingResponse::from_booking(&updated, now))
        }
        None => {
            // Guard miss: a concurrent transition won. Report the state the
            // row actually holds now.
            let current = state
                .booking_repo
                .find_by_id(booking_id)
                .await?
                .ok_or(AppError::NotFound("Booking not found".into()))?;
            warn!(
                "Booking {} transition {:?} lost to a concurrent update",
                booking_id, action
            );
            Err(AppError::InvalidState {
                current: current.effective_status(now),
            })
        }
    }
}
