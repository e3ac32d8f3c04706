pub mod appointments;
pub mod health;
pub mod listings;
pub mod notifications;
pub mod users;
