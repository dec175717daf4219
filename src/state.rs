use crate::config::Config;
use crate::domain::ports::{AvailabilityRepository, BookingNotifier, BookingRepository};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub notifier: Arc<dyn BookingNotifier>,
}
