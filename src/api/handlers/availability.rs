use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveTime, Weekday};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::RuleSpec;
use crate::api::extractors::actor::AuthActor;
use crate::domain::models::actor::{Actor, Role};
use crate::domain::models::availability::AvailabilityRule;
use crate::domain::services::defaults::standard_week_rules;
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let rules = state.availability_repo.list_rules(&provider_id).await?;
    Ok(Json(rules))
}

pub async fn replace_rules(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(provider_id): Path<String>,
    Json(payload): Json<Vec<RuleSpec>>,
) -> Result<impl IntoResponse, AppError> {
    require_owning_provider(&actor, &provider_id)?;

    // Validate the whole payload before touching the store.
    let mut rules = Vec::with_capacity(payload.len());
    for spec in &payload {
        rules.push(parse_rule(&provider_id, spec)?);
    }

    let saved = state
        .availability_repo
        .replace_rules(&provider_id, &rules)
        .await?;
    info!(
        "Availability replaced for provider {}: {} rules",
        provider_id,
        saved.len()
    );
    Ok(Json(saved))
}

pub async fn apply_default_rules(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(provider_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_owning_provider(&actor, &provider_id)?;

    let rules = standard_week_rules(&provider_id);
    let saved = state
        .availability_repo
        .replace_rules(&provider_id, &rules)
        .await?;
    info!("Default availability applied for provider {}", provider_id);
    Ok(Json(saved))
}

fn require_owning_provider(actor: &Actor, provider_id: &str) -> Result<(), AppError> {
    if actor.role != Role::Provider || actor.id != provider_id {
        return Err(AppError::Forbidden(
            "Only the owning provider may edit availability".into(),
        ));
    }
    Ok(())
}

fn parse_rule(provider_id: &str, spec: &RuleSpec) -> Result<AvailabilityRule, AppError> {
    let weekday: Weekday = spec
        .weekday
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid weekday '{}'", spec.weekday)))?;
    let start = NaiveTime::parse_from_str(&spec.start, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid start time format (HH:MM)".into()))?;
    let end = NaiveTime::parse_from_str(&spec.end, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid end time format (HH:MM)".into()))?;
    if start >= end {
        return Err(AppError::Validation(
            "Rule start time must be before end time".into(),
        ));
    }

    Ok(AvailabilityRule::new(
        provider_id.to_string(),
        weekday.number_from_monday() as i32,
        start,
        end,
        spec.active.unwrap_or(true),
    ))
}
