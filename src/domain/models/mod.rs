pub mod actor;
pub mod availability;
pub mod booking;
pub mod slot;
