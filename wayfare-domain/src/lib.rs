pub mod actor;
pub mod booking;
pub mod edge;
pub mod error;
pub mod inventory;
pub mod notification;
pub mod package;
pub mod repository;

pub use actor::{ActorProfile, ActorRef, ActorType};
pub use booking::{Booking, BookingStatus};
pub use edge::{FollowEdge, LikeTarget, TargetKind, ToggleState};
pub use error::DomainError;
pub use notification::{Notification, NotificationKind, RelatedEntityKind};
pub use package::TravelPackage;
