pub mod defaults;
pub mod lifecycle;
pub mod projector;
