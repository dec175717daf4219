use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, NaiveTime, Utc};
use std::sync::Arc;

use crate::api::dtos::{requests::SlotsQuery, responses::SlotsResponse};
use crate::domain::services::projector::{project_slots, DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS};
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Query(params): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let horizon_days = params
        .horizon_days
        .unwrap_or(DEFAULT_HORIZON_DAYS)
        .min(MAX_HORIZON_DAYS);

    let rules = state.availability_repo.list_rules(&provider_id).await?;

    let now = Utc::now();
    let window_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let window_end = window_start + Duration::days(horizon_days as i64);
    let bookings = state
        .booking_repo
        .list_occupied_in_window(&provider_id, window_start, window_end)
        .await?;

    let slots = project_slots(&provider_id, &rules, &bookings, now, horizon_days);

    Ok(Json(SlotsResponse {
        provider_id,
        horizon_days,
        slots,
    }))
}
