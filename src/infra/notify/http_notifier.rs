use crate::domain::models::booking::Booking;
use crate::domain::ports::BookingNotifier;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::error;

pub struct HttpBookingNotifier {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpBookingNotifier {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct BookingCreatedPayload {
    event: &'static str,
    booking_id: String,
    provider_id: String,
    requester_id: String,
    subject_ref: Option<String>,
    start_time: DateTime<Utc>,
    duration_min: i32,
    price_cents: i64,
}

#[async_trait]
impl BookingNotifier for HttpBookingNotifier {
    async fn booking_created(&self, booking: &Booking) -> Result<(), AppError> {
        let payload = BookingCreatedPayload {
            event: "booking.created",
            booking_id: booking.id.clone(),
            provider_id: booking.provider_id.clone(),
            requester_id: booking.requester_id.clone(),
            subject_ref: booking.subject_ref.clone(),
            start_time: booking.start_time,
            duration_min: booking.duration_min,
            price_cents: booking.price_cents,
        };

        let res = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Messaging service connection error: {}", e);
                AppError::Internal
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            error!("Messaging service failed. Status: {}, Body: {}", status, text);
            return Err(AppError::Internal);
        }

        Ok(())
    }
}
