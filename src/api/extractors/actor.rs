use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tracing::Span;

use crate::domain::models::actor::{Actor, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// Verified caller identity from the identity service's bearer token.
/// Ids in paths and bodies are never trusted for authorization decisions.
pub struct AuthActor(pub Actor);

impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let decoding_key = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes())
            .map_err(|_| AppError::Internal)?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[&app_state.config.auth_audience]);

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized)?;

        let actor = Actor {
            id: token_data.claims.sub,
            role: token_data.claims.role,
        };

        Span::current().record("actor_id", &actor.id);
        Span::current().record("role", tracing::field::debug(actor.role));

        Ok(AuthActor(actor))
    }
}
