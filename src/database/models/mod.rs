pub mod appointment;
pub mod listing;
pub mod notification;
pub mod user;

pub use appointment::*;
pub use listing::*;
pub use notification::*;
pub use user::*;
