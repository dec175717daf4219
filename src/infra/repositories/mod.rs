pub mod sqlite_availability_repo;
pub mod sqlite_booking_repo;

pub mod postgres_availability_repo;
pub mod postgres_booking_repo;
