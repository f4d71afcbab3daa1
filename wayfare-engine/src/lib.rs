pub mod booking;
pub mod notify;
pub mod social;

pub use booking::BookingService;
pub use notify::NotificationService;
pub use social::SocialService;
