use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

use crate::api::handlers::{availability, booking, booking_management, health, slots};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Availability templates
        .route(
            "/api/v1/providers/{provider_id}/availability",
            get(availability::list_rules).put(availability::replace_rules),
        )
        .route(
            "/api/v1/providers/{provider_id}/availability/defaults",
            post(availability::apply_default_rules),
        )

        // Slot projection
        .route("/api/v1/providers/{provider_id}/slots", get(slots::get_slots))

        // Bookings
        .route(
            "/api/v1/bookings",
            post(booking::create_booking).get(booking::list_bookings),
        )
        .route("/api/v1/bookings/{booking_id}", get(booking::get_booking))

        // Lifecycle transitions
        .route(
            "/api/v1/bookings/{booking_id}/approve",
            post(booking_management::approve_booking),
        )
        .route(
            "/api/v1/bookings/{booking_id}/reject",
            post(booking_management::reject_booking),
        )
        .route(
            "/api/v1/bookings/{booking_id}/cancel",
            post(booking_management::cancel_booking),
        )

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        actor_id = tracing::field::Empty,
                        role = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
