mod common;

use common::{services, MemoryStore};
use std::sync::Arc;
use uuid::Uuid;
use wayfare_domain::repository::BookingRepository;
use wayfare_domain::{BookingStatus, DomainError, NotificationKind};

#[tokio::test]
async fn create_produces_pending_booking_and_notifies_agency() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);

    let traveler = store.add_traveler("mina");
    let agency = store.add_agency("roamco");
    let package = store.add_package(agency.actor_id, "Coastal loop", 5);

    let booking = bookings
        .create(traveler.actor_id, package.id, 2)
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::Pending);
    // Advisory pre-check only: nothing is reserved until acceptance.
    assert_eq!(store.package(package.id).available_slots, 5);

    let fanout = store.notifications();
    assert_eq!(fanout.len(), 1);
    assert_eq!(fanout[0].recipient, agency);
    assert_eq!(fanout[0].sender, traveler);
    assert_eq!(fanout[0].kind, NotificationKind::BookingRequest);
    assert!(fanout[0].message.contains("Coastal loop"));
}

#[tokio::test]
async fn create_rejects_zero_slots_before_touching_inventory() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);

    let traveler = store.add_traveler("mina");
    let agency = store.add_agency("roamco");
    let package = store.add_package(agency.actor_id, "Coastal loop", 5);

    let err = bookings
        .create(traveler.actor_id, package.id, 0)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(store.booking_count(), 0);
    assert_eq!(store.package(package.id).available_slots, 5);
    assert!(store.notifications().is_empty());
}

#[tokio::test]
async fn create_rejects_requests_beyond_current_pool() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);

    let traveler = store.add_traveler("mina");
    let agency = store.add_agency("roamco");
    let package = store.add_package(agency.actor_id, "Coastal loop", 2);

    let err = bookings
        .create(traveler.actor_id, package.id, 3)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DomainError::InsufficientCapacity {
            requested: 3,
            available: 2
        }
    ));
}

#[tokio::test]
async fn create_for_missing_package_is_not_found() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);
    let traveler = store.add_traveler("mina");

    let err = bookings
        .create(traveler.actor_id, Uuid::new_v4(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound("package")));
}

#[tokio::test]
async fn accept_reserves_slots_and_notifies_traveler() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);

    let traveler = store.add_traveler("mina");
    let agency = store.add_agency("roamco");
    let package = store.add_package(agency.actor_id, "Coastal loop", 5);

    let booking = bookings
        .create(traveler.actor_id, package.id, 3)
        .await
        .unwrap();
    let confirmed = bookings.accept(booking.id, agency.actor_id).await.unwrap();

    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert_eq!(store.package(package.id).available_slots, 2);

    let fanout = store.notifications();
    let confirm_note = fanout
        .iter()
        .find(|n| n.kind == NotificationKind::BookingConfirmed)
        .unwrap();
    assert_eq!(confirm_note.recipient, traveler);
    assert_eq!(confirm_note.sender, agency);
}

#[tokio::test]
async fn accept_by_non_owner_is_forbidden() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);

    let traveler = store.add_traveler("mina");
    let agency = store.add_agency("roamco");
    let other_agency = store.add_agency("otherco");
    let package = store.add_package(agency.actor_id, "Coastal loop", 5);

    let booking = bookings
        .create(traveler.actor_id, package.id, 1)
        .await
        .unwrap();
    let err = bookings
        .accept(booking.id, other_agency.actor_id)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Forbidden(_)));
    assert_eq!(store.package(package.id).available_slots, 5);
}

#[tokio::test]
async fn accept_twice_conflicts() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);

    let traveler = store.add_traveler("mina");
    let agency = store.add_agency("roamco");
    let package = store.add_package(agency.actor_id, "Coastal loop", 5);

    let booking = bookings
        .create(traveler.actor_id, package.id, 2)
        .await
        .unwrap();
    bookings.accept(booking.id, agency.actor_id).await.unwrap();

    let err = bookings
        .accept(booking.id, agency.actor_id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    // Slots held exactly once.
    assert_eq!(store.package(package.id).available_slots, 3);
}

#[tokio::test]
async fn accept_then_delete_restores_available_slots() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);

    let traveler = store.add_traveler("mina");
    let agency = store.add_agency("roamco");
    let package = store.add_package(agency.actor_id, "Coastal loop", 5);

    let booking = bookings
        .create(traveler.actor_id, package.id, 3)
        .await
        .unwrap();
    bookings.accept(booking.id, agency.actor_id).await.unwrap();
    assert_eq!(store.package(package.id).available_slots, 2);

    bookings.delete(booking.id, agency.actor_id).await.unwrap();
    assert_eq!(store.package(package.id).available_slots, 5);
    assert_eq!(store.booking_count(), 0);

    let cancelled_note = store
        .notifications()
        .into_iter()
        .find(|n| n.kind == NotificationKind::BookingCancelled)
        .unwrap();
    assert_eq!(cancelled_note.recipient, traveler);
}

#[tokio::test]
async fn reject_of_confirmed_booking_releases_slots() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);

    let traveler = store.add_traveler("mina");
    let agency = store.add_agency("roamco");
    let package = store.add_package(agency.actor_id, "Coastal loop", 4);

    let booking = bookings
        .create(traveler.actor_id, package.id, 4)
        .await
        .unwrap();
    bookings.accept(booking.id, agency.actor_id).await.unwrap();
    assert_eq!(store.package(package.id).available_slots, 0);

    let cancelled = bookings.reject(booking.id, agency.actor_id).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(store.package(package.id).available_slots, 4);

    let note = store
        .notifications()
        .into_iter()
        .find(|n| n.kind == NotificationKind::BookingRejected)
        .unwrap();
    assert_eq!(note.recipient, traveler);
}

#[tokio::test]
async fn reject_of_cancelled_booking_conflicts_without_double_release() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);

    let traveler = store.add_traveler("mina");
    let agency = store.add_agency("roamco");
    let package = store.add_package(agency.actor_id, "Coastal loop", 4);

    let booking = bookings
        .create(traveler.actor_id, package.id, 2)
        .await
        .unwrap();
    bookings.accept(booking.id, agency.actor_id).await.unwrap();
    bookings.reject(booking.id, agency.actor_id).await.unwrap();
    assert_eq!(store.package(package.id).available_slots, 4);

    let err = bookings
        .reject(booking.id, agency.actor_id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    // Slots were returned exactly once.
    assert_eq!(store.package(package.id).available_slots, 4);
}

#[tokio::test]
async fn confirm_refuses_a_booking_cancelled_in_the_meantime() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);

    let traveler = store.add_traveler("mina");
    let agency = store.add_agency("roamco");
    let package = store.add_package(agency.actor_id, "Coastal loop", 5);

    let booking = bookings
        .create(traveler.actor_id, package.id, 2)
        .await
        .unwrap();

    // A reject lands after the accept path's status read but before the
    // store-level confirm. Cancelled is terminal: the confirm must fail
    // instead of resurrecting the booking.
    BookingRepository::cancel(store.as_ref(), booking.id)
        .await
        .unwrap();

    let err = BookingRepository::confirm(store.as_ref(), booking.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let stored = BookingRepository::find(store.as_ref(), booking.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, BookingStatus::Cancelled);
    // No slots were held by the failed confirm.
    assert_eq!(store.package(package.id).available_slots, 5);
}

#[tokio::test]
async fn concurrent_accepts_admit_only_what_fits() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);

    let agency = store.add_agency("roamco");
    let traveler_a = store.add_traveler("mina");
    let traveler_b = store.add_traveler("theo");
    let package = store.add_package(agency.actor_id, "Coastal loop", 5);

    let first = bookings
        .create(traveler_a.actor_id, package.id, 3)
        .await
        .unwrap();
    let second = bookings
        .create(traveler_b.actor_id, package.id, 3)
        .await
        .unwrap();

    let svc_a: Arc<_> = bookings.clone();
    let svc_b: Arc<_> = bookings.clone();
    let agency_id = agency.actor_id;
    let handle_a = tokio::spawn(async move { svc_a.accept(first.id, agency_id).await });
    let handle_b = tokio::spawn(async move { svc_b.accept(second.id, agency_id).await });

    let result_a = handle_a.await.unwrap();
    let result_b = handle_b.await.unwrap();

    let successes = [&result_a, &result_b]
        .iter()
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(successes, 1, "exactly one accept must win");

    let loser = if result_a.is_err() { result_a } else { result_b };
    assert!(matches!(
        loser.unwrap_err(),
        DomainError::InsufficientCapacity { .. }
    ));

    let remaining = store.package(package.id).available_slots;
    assert_eq!(remaining, 2);
    assert!(remaining >= 0);
}

#[tokio::test]
async fn get_returns_joined_details() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);

    let traveler = store.add_traveler("mina");
    let agency = store.add_agency("roamco");
    let package = store.add_package(agency.actor_id, "Coastal loop", 5);

    let booking = bookings
        .create(traveler.actor_id, package.id, 2)
        .await
        .unwrap();
    let details = bookings.get(booking.id).await.unwrap();

    assert_eq!(details.booking.id, booking.id);
    assert_eq!(details.traveler_user_name, "mina");
    assert_eq!(details.package_title, "Coastal loop");
    assert_eq!(details.package_agency_id, agency.actor_id);

    let err = bookings.get(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound("booking")));
}

#[tokio::test]
async fn notifications_never_target_their_sender() {
    let store = MemoryStore::new();
    let (bookings, _, _) = services(&store);

    let traveler = store.add_traveler("mina");
    let agency = store.add_agency("roamco");
    let package = store.add_package(agency.actor_id, "Coastal loop", 5);

    let booking = bookings
        .create(traveler.actor_id, package.id, 1)
        .await
        .unwrap();
    bookings.accept(booking.id, agency.actor_id).await.unwrap();

    for note in store.notifications() {
        assert_ne!(note.recipient, note.sender);
    }
}
