pub mod admin;
pub mod events;
pub mod hotels;
pub mod owners;
