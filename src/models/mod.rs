pub mod event;
pub mod hotel;
