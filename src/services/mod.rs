pub mod appointments;
pub mod lifecycle;
pub mod listings;
pub mod notifications;
pub mod notify;
pub mod users;

pub use appointments::AppointmentService;
pub use listings::ListingService;
pub use notifications::NotificationService;
pub use notify::Notifier;
pub use users::UserService;
