use async_trait::async_trait;
use uuid::Uuid;

use crate::actor::{ActorProfile, ActorRef};
use crate::booking::{Booking, BookingDetails};
use crate::edge::{FollowEdge, LikeTarget, TargetKind};
use crate::error::DomainError;
use crate::notification::Notification;
use crate::package::TravelPackage;

#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn insert(&self, package: &TravelPackage) -> Result<(), DomainError>;
    async fn find(&self, id: Uuid) -> Result<Option<TravelPackage>, DomainError>;
}

/// Booking persistence. The three mutating operations are atomic by
/// contract: implementations must make the inventory adjustment and the
/// status/row change succeed or fail together, and the capacity
/// check-and-decrement in `confirm` must be serializable per package.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: &Booking) -> Result<(), DomainError>;
    async fn find(&self, id: Uuid) -> Result<Option<Booking>, DomainError>;
    async fn find_details(&self, id: Uuid) -> Result<Option<BookingDetails>, DomainError>;

    /// Reserve `slots_booked` on the package and flip the booking from
    /// Pending to Confirmed. Fails `InsufficientCapacity` when the pool has
    /// shrunk below the request since creation, `Conflict` when the booking
    /// is no longer Pending.
    async fn confirm(&self, booking_id: Uuid) -> Result<Booking, DomainError>;

    /// Set the booking to Cancelled, releasing its slots first when the
    /// prior status was Confirmed.
    async fn cancel(&self, booking_id: Uuid) -> Result<Booking, DomainError>;

    /// Remove the booking row, releasing its slots first when the status
    /// was Confirmed. Returns the removed booking.
    async fn remove(&self, booking_id: Uuid) -> Result<Booking, DomainError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, notification: &Notification) -> Result<(), DomainError>;

    /// Newest first. `is_read: None` returns both read and unread.
    async fn list(
        &self,
        recipient: &ActorRef,
        is_read: Option<bool>,
    ) -> Result<Vec<Notification>, DomainError>;

    /// Recipient-scoped: `None` when the id does not exist *or* is addressed
    /// to someone else.
    async fn mark_read(
        &self,
        id: Uuid,
        recipient: &ActorRef,
    ) -> Result<Option<Notification>, DomainError>;

    /// Recipient-scoped; `false` on miss for either reason.
    async fn delete(&self, id: Uuid, recipient: &ActorRef) -> Result<bool, DomainError>;
}

/// Presence-set storage for the unified follow/like edge table.
#[async_trait]
pub trait EdgeRepository: Send + Sync {
    /// `true` when an edge existed and was removed.
    async fn delete_follow(
        &self,
        follower: &ActorRef,
        following: &ActorRef,
    ) -> Result<bool, DomainError>;

    /// Fails `Conflict` on a duplicate ordered pair.
    async fn insert_follow(&self, edge: &FollowEdge) -> Result<(), DomainError>;

    async fn followers(&self, of: &ActorRef) -> Result<Vec<ActorProfile>, DomainError>;
    async fn following(&self, actor: &ActorRef) -> Result<Vec<ActorProfile>, DomainError>;

    async fn delete_like(
        &self,
        target: &LikeTarget,
        liked_by: &ActorRef,
    ) -> Result<bool, DomainError>;

    /// Returns the new edge id. Fails `Conflict` on a duplicate
    /// (target, liked_by) pair.
    async fn insert_like(
        &self,
        target: &LikeTarget,
        liked_by: &ActorRef,
    ) -> Result<Uuid, DomainError>;

    /// Distinct actor identities that like the target, not raw edge rows.
    async fn like_count(&self, target: &LikeTarget) -> Result<i64, DomainError>;

    /// Ids of every target of `kind` the actor currently likes.
    async fn liked_targets(
        &self,
        liked_by: &ActorRef,
        kind: TargetKind,
    ) -> Result<Vec<Uuid>, DomainError>;
}

/// The one place "which table does this actor live in" is answered.
#[async_trait]
pub trait ActorDirectory: Send + Sync {
    /// Travelers are searched before agencies, matching the platform's
    /// original lookup order for ambiguous handles.
    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<ActorProfile>, DomainError>;

    async fn resolve(&self, actor: &ActorRef) -> Result<Option<ActorProfile>, DomainError>;
}

/// Resolves the owning actor of likeable content, one lookup per kind.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    async fn owner_of(&self, target: &LikeTarget) -> Result<Option<ActorRef>, DomainError>;
}
