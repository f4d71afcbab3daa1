use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::notify::NotificationService;
use wayfare_domain::booking::BookingDetails;
use wayfare_domain::repository::{BookingRepository, PackageRepository};
use wayfare_domain::{
    ActorRef, Booking, BookingStatus, DomainError, NotificationKind, RelatedEntityKind,
    TravelPackage,
};

/// Drives a booking through Pending -> Confirmed | Cancelled, adjusting the
/// package slot pool on the transitions that hold capacity and fanning out a
/// notification for every state change.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    packages: Arc<dyn PackageRepository>,
    notifier: Arc<NotificationService>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        packages: Arc<dyn PackageRepository>,
        notifier: Arc<NotificationService>,
    ) -> Self {
        Self {
            bookings,
            packages,
            notifier,
        }
    }

    /// A traveler requests `slots` on a package. The capacity check here is
    /// advisory only: nothing is reserved until the agency accepts, so a
    /// request that passes now can still fail at accept time.
    pub async fn create(
        &self,
        traveler_id: Uuid,
        package_id: Uuid,
        slots: i32,
    ) -> Result<Booking, DomainError> {
        let booking = Booking::new(traveler_id, package_id, slots)?;

        let package = self
            .packages
            .find(package_id)
            .await?
            .ok_or(DomainError::NotFound("package"))?;

        if slots > package.available_slots {
            return Err(DomainError::InsufficientCapacity {
                requested: slots,
                available: package.available_slots,
            });
        }

        self.bookings.insert(&booking).await?;
        info!(booking_id = %booking.id, package_id = %package_id, slots, "booking requested");

        self.notifier
            .notify(
                ActorRef::traveler(traveler_id),
                ActorRef::agency(package.agency_id),
                NotificationKind::BookingRequest,
                booking.id,
                RelatedEntityKind::Booking,
                format!(
                    "Traveler requested {} slot(s) for package: {}.",
                    slots, package.title
                ),
            )
            .await?;

        Ok(booking)
    }

    /// The owning agency accepts a pending request. Capacity is re-validated
    /// and decremented atomically in the store; when several pending
    /// requests race for a shrinking pool the first accept wins and later
    /// ones fail with `InsufficientCapacity`.
    pub async fn accept(
        &self,
        booking_id: Uuid,
        acting_agency_id: Uuid,
    ) -> Result<Booking, DomainError> {
        let (booking, package) = self.load_authorized(booking_id, acting_agency_id).await?;
        booking.ensure_pending()?;

        let confirmed = self.bookings.confirm(booking_id).await?;
        info!(
            booking_id = %booking_id,
            package_id = %package.id,
            slots = confirmed.slots_booked,
            "booking confirmed"
        );

        self.notifier
            .notify(
                ActorRef::agency(acting_agency_id),
                ActorRef::traveler(confirmed.traveler_id),
                NotificationKind::BookingConfirmed,
                confirmed.id,
                RelatedEntityKind::Booking,
                format!(
                    "Your booking for package: {} has been accepted.",
                    package.title
                ),
            )
            .await?;

        Ok(confirmed)
    }

    /// The owning agency rejects a request. Rejecting a Confirmed booking is
    /// a revoke: its slots are released (atomically with the status flip)
    /// before the booking is cancelled. Rejecting an already-Cancelled
    /// booking is a conflict so slots can never be released twice.
    pub async fn reject(
        &self,
        booking_id: Uuid,
        acting_agency_id: Uuid,
    ) -> Result<Booking, DomainError> {
        let (booking, package) = self.load_authorized(booking_id, acting_agency_id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(DomainError::Conflict(
                "booking is already Cancelled".to_string(),
            ));
        }

        let cancelled = self.bookings.cancel(booking_id).await?;
        info!(booking_id = %booking_id, package_id = %package.id, "booking rejected");

        self.notifier
            .notify(
                ActorRef::agency(acting_agency_id),
                ActorRef::traveler(cancelled.traveler_id),
                NotificationKind::BookingRejected,
                cancelled.id,
                RelatedEntityKind::Booking,
                format!(
                    "Your booking for package: {} has been rejected.",
                    package.title
                ),
            )
            .await?;

        Ok(cancelled)
    }

    /// The owning agency removes the booking record entirely. A Confirmed
    /// booking gives its slots back before the row disappears.
    pub async fn delete(
        &self,
        booking_id: Uuid,
        acting_agency_id: Uuid,
    ) -> Result<(), DomainError> {
        let (_, package) = self.load_authorized(booking_id, acting_agency_id).await?;

        let removed = self.bookings.remove(booking_id).await?;
        info!(booking_id = %booking_id, package_id = %package.id, "booking deleted");

        self.notifier
            .notify(
                ActorRef::agency(acting_agency_id),
                ActorRef::traveler(removed.traveler_id),
                NotificationKind::BookingCancelled,
                removed.id,
                RelatedEntityKind::Booking,
                format!(
                    "Your booking for package: {} has been cancelled.",
                    package.title
                ),
            )
            .await?;

        Ok(())
    }

    pub async fn get(&self, booking_id: Uuid) -> Result<BookingDetails, DomainError> {
        self.bookings
            .find_details(booking_id)
            .await?
            .ok_or(DomainError::NotFound("booking"))
    }

    async fn load_authorized(
        &self,
        booking_id: Uuid,
        acting_agency_id: Uuid,
    ) -> Result<(Booking, TravelPackage), DomainError> {
        let booking = self
            .bookings
            .find(booking_id)
            .await?
            .ok_or(DomainError::NotFound("booking"))?;
        let package = self
            .packages
            .find(booking.package_id)
            .await?
            .ok_or(DomainError::NotFound("package"))?;

        if package.agency_id != acting_agency_id {
            return Err(DomainError::Forbidden(
                "You are not authorized to handle this booking.".to_string(),
            ));
        }
        Ok((booking, package))
    }
}
