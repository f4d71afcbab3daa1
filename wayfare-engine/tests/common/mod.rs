//! Shared in-memory store used by the engine integration tests. One mutex
//! guards all state, so the repository contract's atomicity requirements
//! hold the same way they do in the Postgres implementations.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use wayfare_domain::booking::BookingDetails;
use wayfare_domain::repository::{
    ActorDirectory, BookingRepository, ContentResolver, EdgeRepository, NotificationRepository,
    PackageRepository,
};
use wayfare_domain::{
    ActorProfile, ActorRef, ActorType, Booking, BookingStatus, DomainError, FollowEdge,
    LikeTarget, Notification, TargetKind, TravelPackage,
};
use wayfare_engine::{BookingService, NotificationService, SocialService};

struct LikeRow {
    id: Uuid,
    target: LikeTarget,
    liked_by: ActorRef,
}

#[derive(Default)]
struct Inner {
    packages: HashMap<Uuid, TravelPackage>,
    bookings: HashMap<Uuid, Booking>,
    notifications: Vec<Notification>,
    follows: Vec<FollowEdge>,
    likes: Vec<LikeRow>,
    profiles: Vec<ActorProfile>,
    content_owners: HashMap<LikeTarget, ActorRef>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_traveler(&self, user_name: &str) -> ActorRef {
        self.add_profile(ActorType::Traveler, user_name)
    }

    pub fn add_agency(&self, user_name: &str) -> ActorRef {
        self.add_profile(ActorType::Agency, user_name)
    }

    fn add_profile(&self, actor_type: ActorType, user_name: &str) -> ActorRef {
        let actor = ActorRef {
            actor_type,
            actor_id: Uuid::new_v4(),
        };
        self.inner.lock().unwrap().profiles.push(ActorProfile {
            actor,
            user_name: user_name.to_string(),
            display_name: user_name.to_string(),
            avatar_url: None,
        });
        actor
    }

    pub fn add_package(&self, agency_id: Uuid, title: &str, max_slots: i32) -> TravelPackage {
        let start = Utc::now() + Duration::days(30);
        let package = TravelPackage::new(
            agency_id,
            title.to_string(),
            "fixture".to_string(),
            10_000,
            start,
            start + Duration::days(7),
            max_slots,
        )
        .unwrap();
        self.inner
            .lock()
            .unwrap()
            .packages
            .insert(package.id, package.clone());
        package
    }

    pub fn add_content(&self, target: LikeTarget, owner: ActorRef) {
        self.inner
            .lock()
            .unwrap()
            .content_owners
            .insert(target, owner);
    }

    /// Simulates a duplicate-insert bug in the edge table: a second raw row
    /// for an identity that already likes the target.
    pub fn inject_duplicate_like(&self, target: LikeTarget, liked_by: ActorRef) {
        self.inner.lock().unwrap().likes.push(LikeRow {
            id: Uuid::new_v4(),
            target,
            liked_by,
        });
    }

    pub fn package(&self, id: Uuid) -> TravelPackage {
        self.inner.lock().unwrap().packages[&id].clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.lock().unwrap().notifications.clone()
    }

    pub fn booking_count(&self) -> usize {
        self.inner.lock().unwrap().bookings.len()
    }
}

/// Wires the three services over one shared store.
pub fn services(
    store: &Arc<MemoryStore>,
) -> (
    Arc<BookingService>,
    Arc<SocialService>,
    Arc<NotificationService>,
) {
    let notifier = Arc::new(NotificationService::new(store.clone()));
    let bookings = Arc::new(BookingService::new(
        store.clone(),
        store.clone(),
        notifier.clone(),
    ));
    let social = Arc::new(SocialService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        notifier.clone(),
    ));
    (bookings, social, notifier)
}

#[async_trait]
impl PackageRepository for MemoryStore {
    async fn insert(&self, package: &TravelPackage) -> Result<(), DomainError> {
        self.inner
            .lock()
            .unwrap()
            .packages
            .insert(package.id, package.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<TravelPackage>, DomainError> {
        Ok(self.inner.lock().unwrap().packages.get(&id).cloned())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn insert(&self, booking: &Booking) -> Result<(), DomainError> {
        self.inner
            .lock()
            .unwrap()
            .bookings
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Booking>, DomainError> {
        Ok(self.inner.lock().unwrap().bookings.get(&id).cloned())
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<BookingDetails>, DomainError> {
        let inner = self.inner.lock().unwrap();
        let Some(booking) = inner.bookings.get(&id) else {
            return Ok(None);
        };
        let traveler = inner
            .profiles
            .iter()
            .find(|p| p.actor == ActorRef::traveler(booking.traveler_id))
            .ok_or(DomainError::NotFound("traveler"))?;
        let package = inner
            .packages
            .get(&booking.package_id)
            .ok_or(DomainError::NotFound("package"))?;

        Ok(Some(BookingDetails {
            booking: booking.clone(),
            traveler_name: traveler.display_name.clone(),
            traveler_user_name: traveler.user_name.clone(),
            package_title: package.title.clone(),
            package_agency_id: package.agency_id,
        }))
    }

    async fn confirm(&self, booking_id: Uuid) -> Result<Booking, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        let booking = inner
            .bookings
            .get(&booking_id)
            .cloned()
            .ok_or(DomainError::NotFound("booking"))?;
        if booking.status != BookingStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "booking is already {}",
                booking.status
            )));
        }

        let package = inner
            .packages
            .get(&booking.package_id)
            .cloned()
            .ok_or(DomainError::NotFound("package"))?;

        let mut inventory = package.inventory();
        inventory.reserve(booking.slots_booked)?;

        let pkg = inner.packages.get_mut(&package.id).unwrap();
        pkg.available_slots = inventory.available_slots;
        pkg.updated_at = Utc::now();

        let stored = inner.bookings.get_mut(&booking_id).unwrap();
        stored.status = BookingStatus::Confirmed;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn cancel(&self, booking_id: Uuid) -> Result<Booking, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        let booking = inner
            .bookings
            .get(&booking_id)
            .cloned()
            .ok_or(DomainError::NotFound("booking"))?;

        if booking.status == BookingStatus::Confirmed {
            let package = inner
                .packages
                .get(&booking.package_id)
                .cloned()
                .ok_or(DomainError::NotFound("package"))?;
            let mut inventory = package.inventory();
            inventory.release(booking.slots_booked)?;
            inner.packages.get_mut(&package.id).unwrap().available_slots =
                inventory.available_slots;
        }

        let stored = inner.bookings.get_mut(&booking_id).unwrap();
        stored.status = BookingStatus::Cancelled;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn remove(&self, booking_id: Uuid) -> Result<Booking, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        let booking = inner
            .bookings
            .get(&booking_id)
            .cloned()
            .ok_or(DomainError::NotFound("booking"))?;

        if booking.status == BookingStatus::Confirmed {
            let package = inner
                .packages
                .get(&booking.package_id)
                .cloned()
                .ok_or(DomainError::NotFound("package"))?;
            let mut inventory = package.inventory();
            inventory.release(booking.slots_booked)?;
            inner.packages.get_mut(&package.id).unwrap().available_slots =
                inventory.available_slots;
        }

        inner.bookings.remove(&booking_id);
        Ok(booking)
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn insert(&self, notification: &Notification) -> Result<(), DomainError> {
        self.inner
            .lock()
            .unwrap()
            .notifications
            .push(notification.clone());
        Ok(())
    }

    async fn list(
        &self,
        recipient: &ActorRef,
        is_read: Option<bool>,
    ) -> Result<Vec<Notification>, DomainError> {
        let inner = self.inner.lock().unwrap();
        // Insertion order is creation order; newest first means reversed.
        Ok(inner
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient == *recipient)
            .filter(|n| is_read.is_none_or(|flag| n.is_read == flag))
            .cloned()
            .collect())
    }

    async fn mark_read(
        &self,
        id: Uuid,
        recipient: &ActorRef,
    ) -> Result<Option<Notification>, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        for n in inner.notifications.iter_mut() {
            if n.id == id && n.recipient == *recipient {
                n.is_read = true;
                return Ok(Some(n.clone()));
            }
        }
        Ok(None)
    }

    async fn delete(&self, id: Uuid, recipient: &ActorRef) -> Result<bool, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.notifications.len();
        inner
            .notifications
            .retain(|n| !(n.id == id && n.recipient == *recipient));
        Ok(inner.notifications.len() < before)
    }
}

#[async_trait]
impl EdgeRepository for MemoryStore {
    async fn delete_follow(
        &self,
        follower: &ActorRef,
        following: &ActorRef,
    ) -> Result<bool, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.follows.len();
        inner
            .follows
            .retain(|e| !(e.follower == *follower && e.following == *following));
        Ok(inner.follows.len() < before)
    }

    async fn insert_follow(&self, edge: &FollowEdge) -> Result<(), DomainError> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .follows
            .iter()
            .any(|e| e.follower == edge.follower && e.following == edge.following)
        {
            return Err(DomainError::Conflict("follow edge already exists".into()));
        }
        inner.follows.push(edge.clone());
        Ok(())
    }

    async fn followers(&self, of: &ActorRef) -> Result<Vec<ActorProfile>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .follows
            .iter()
            .filter(|e| e.following == *of)
            .filter_map(|e| inner.profiles.iter().find(|p| p.actor == e.follower))
            .cloned()
            .collect())
    }

    async fn following(&self, actor: &ActorRef) -> Result<Vec<ActorProfile>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .follows
            .iter()
            .filter(|e| e.follower == *actor)
            .filter_map(|e| inner.profiles.iter().find(|p| p.actor == e.following))
            .cloned()
            .collect())
    }

    async fn delete_like(
        &self,
        target: &LikeTarget,
        liked_by: &ActorRef,
    ) -> Result<bool, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.likes.len();
        inner
            .likes
            .retain(|l| !(l.target == *target && l.liked_by == *liked_by));
        Ok(inner.likes.len() < before)
    }

    async fn insert_like(
        &self,
        target: &LikeTarget,
        liked_by: &ActorRef,
    ) -> Result<Uuid, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .likes
            .iter()
            .any(|l| l.target == *target && l.liked_by == *liked_by)
        {
            return Err(DomainError::Conflict("like edge already exists".into()));
        }
        let id = Uuid::new_v4();
        inner.likes.push(LikeRow {
            id,
            target: *target,
            liked_by: *liked_by,
        });
        Ok(id)
    }

    async fn like_count(&self, target: &LikeTarget) -> Result<i64, DomainError> {
        let inner = self.inner.lock().unwrap();
        let distinct: HashSet<ActorRef> = inner
            .likes
            .iter()
            .filter(|l| l.target == *target)
            .map(|l| l.liked_by)
            .collect();
        Ok(distinct.len() as i64)
    }

    async fn liked_targets(
        &self,
        liked_by: &ActorRef,
        kind: TargetKind,
    ) -> Result<Vec<Uuid>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .likes
            .iter()
            .filter(|l| l.liked_by == *liked_by && l.target.kind == kind)
            .map(|l| l.target.id)
            .collect())
    }
}

#[async_trait]
impl ActorDirectory for MemoryStore {
    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<ActorProfile>, DomainError> {
        let inner = self.inner.lock().unwrap();
        // Travelers before agencies, matching the platform's lookup order.
        let traveler = inner
            .profiles
            .iter()
            .find(|p| p.user_name == user_name && p.actor.actor_type == ActorType::Traveler);
        if traveler.is_some() {
            return Ok(traveler.cloned());
        }
        Ok(inner
            .profiles
            .iter()
            .find(|p| p.user_name == user_name && p.actor.actor_type == ActorType::Agency)
            .cloned())
    }

    async fn resolve(&self, actor: &ActorRef) -> Result<Option<ActorProfile>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.profiles.iter().find(|p| p.actor == *actor).cloned())
    }
}

#[async_trait]
impl ContentResolver for MemoryStore {
    async fn owner_of(&self, target: &LikeTarget) -> Result<Option<ActorRef>, DomainError> {
        let inner = self.inner.lock().unwrap();
        if target.kind == TargetKind::Package {
            return Ok(inner
                .packages
                .get(&target.id)
                .map(|p| ActorRef::agency(p.agency_id)));
        }
        Ok(inner.content_owners.get(target).copied())
    }
}
