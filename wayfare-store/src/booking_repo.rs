use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::error;
use uuid::Uuid;

use wayfare_domain::booking::BookingDetails;
use wayfare_domain::repository::BookingRepository;
use wayfare_domain::{Booking, BookingStatus, DomainError};

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    traveler_id: Uuid,
    package_id: Uuid,
    slots_booked: i32,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DomainError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            traveler_id: row.traveler_id,
            package_id: row.package_id,
            slots_booked: row.slots_booked,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BookingDetailsRow {
    id: Uuid,
    traveler_id: Uuid,
    package_id: Uuid,
    slots_booked: i32,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    traveler_name: String,
    traveler_user_name: String,
    package_title: String,
    package_agency_id: Uuid,
}

const BOOKING_COLUMNS: &str =
    "id, traveler_id, package_id, slots_booked, status, created_at, updated_at";

/// Locks the booking row for the rest of the transaction.
async fn lock_booking(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: Uuid,
) -> Result<Booking, DomainError> {
    let row = sqlx::query_as::<_, BookingRow>(&format!(
        "SELECT {} FROM bookings WHERE id = $1 FOR UPDATE",
        BOOKING_COLUMNS
    ))
    .bind(booking_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(DomainError::storage)?
    .ok_or(DomainError::NotFound("booking"))?;

    row.try_into()
}

/// Returns the booking's slots to the package pool. A release that would
/// push the pool past `max_slots` means slots were already returned once;
/// that is surfaced as `CapacityOverflow`, never clamped.
async fn release_slots(
    tx: &mut Transaction<'_, Postgres>,
    package_id: Uuid,
    slots: i32,
) -> Result<(), DomainError> {
    let released = sqlx::query(
        r#"
        UPDATE packages
        SET available_slots = available_slots + $2, updated_at = now()
        WHERE id = $1 AND available_slots + $2 <= max_slots
        "#,
    )
    .bind(package_id)
    .bind(slots)
    .execute(&mut **tx)
    .await
    .map_err(DomainError::storage)?;

    if released.rows_affected() == 0 {
        let max_slots = sqlx::query_scalar::<_, i32>("SELECT max_slots FROM packages WHERE id = $1")
            .bind(package_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(DomainError::storage)?
            .ok_or(DomainError::NotFound("package"))?;

        error!(
            package_id = %package_id,
            slots,
            max_slots,
            "slot release would exceed max capacity; invariant breach"
        );
        return Err(DomainError::CapacityOverflow { slots, max_slots });
    }
    Ok(())
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, traveler_id, package_id, slots_booked, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(booking.id)
        .bind(booking.traveler_id)
        .bind(booking.package_id)
        .bind(booking.slots_booked)
        .bind(booking.status.to_string())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Booking>, DomainError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<BookingDetails>, DomainError> {
        let row = sqlx::query_as::<_, BookingDetailsRow>(
            r#"
            SELECT b.id, b.traveler_id, b.package_id, b.slots_booked, b.status,
                   b.created_at, b.updated_at,
                   t.display_name AS traveler_name,
                   t.user_name AS traveler_user_name,
                   p.title AS package_title,
                   p.agency_id AS package_agency_id
            FROM bookings b
            JOIN travelers t ON t.id = b.traveler_id
            JOIN packages p ON p.id = b.package_id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(BookingDetails {
            booking: Booking {
                id: row.id,
                traveler_id: row.traveler_id,
                package_id: row.package_id,
                slots_booked: row.slots_booked,
                status: row.status.parse()?,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            traveler_name: row.traveler_name,
            traveler_user_name: row.traveler_user_name,
            package_title: row.package_title,
            package_agency_id: row.package_agency_id,
        }))
    }

    async fn confirm(&self, booking_id: Uuid) -> Result<Booking, DomainError> {
        let mut tx = self.pool.begin().await.map_err(DomainError::storage)?;

        // Conditional decrement: only succeeds while the booking is still
        // Pending and the pool can cover it, so two racing accepts can
        // never both pass the capacity check.
        let reserved = sqlx::query(
            r#"
            UPDATE packages p
            SET available_slots = p.available_slots - b.slots_booked, updated_at = now()
            FROM bookings b
            WHERE b.id = $1
              AND p.id = b.package_id
              AND b.status = 'Pending'
              AND p.available_slots >= b.slots_booked
            "#,
        )
        .bind(booking_id)
        .execute(&mut *tx)
        .await
        .map_err(DomainError::storage)?;

        if reserved.rows_affected() == 0 {
            tx.rollback().await.map_err(DomainError::storage)?;
            return Err(self.explain_confirm_failure(booking_id).await);
        }

        // Re-checked under the row lock: between the decrement's snapshot
        // read and here, a cancel/remove can commit a terminal status. A
        // Cancelled booking must never come back Confirmed, so a miss rolls
        // the decrement back.
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET status = 'Confirmed', updated_at = now() \
             WHERE id = $1 AND status = 'Pending' RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DomainError::storage)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(DomainError::storage)?;
            return Err(self.explain_confirm_failure(booking_id).await);
        };

        tx.commit().await.map_err(DomainError::storage)?;
        row.try_into()
    }

    async fn cancel(&self, booking_id: Uuid) -> Result<Booking, DomainError> {
        let mut tx = self.pool.begin().await.map_err(DomainError::storage)?;

        let booking = lock_booking(&mut tx, booking_id).await?;
        if booking.status == BookingStatus::Confirmed {
            release_slots(&mut tx, booking.package_id, booking.slots_booked).await?;
        }

        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET status = 'Cancelled', updated_at = now() \
             WHERE id = $1 RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(booking_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(DomainError::storage)?;

        tx.commit().await.map_err(DomainError::storage)?;
        row.try_into()
    }

    async fn remove(&self, booking_id: Uuid) -> Result<Booking, DomainError> {
        let mut tx = self.pool.begin().await.map_err(DomainError::storage)?;

        let booking = lock_booking(&mut tx, booking_id).await?;
        if booking.status == BookingStatus::Confirmed {
            release_slots(&mut tx, booking.package_id, booking.slots_booked).await?;
        }

        sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(booking_id)
            .execute(&mut *tx)
            .await
            .map_err(DomainError::storage)?;

        tx.commit().await.map_err(DomainError::storage)?;
        Ok(booking)
    }
}

impl PgBookingRepository {
    /// The conditional confirm matched no row; reads current state to tell
    /// the caller which precondition failed.
    async fn explain_confirm_failure(&self, booking_id: Uuid) -> DomainError {
        let booking = match self.find(booking_id).await {
            Ok(Some(b)) => b,
            Ok(None) => return DomainError::NotFound("booking"),
            Err(e) => return e,
        };

        if booking.status != BookingStatus::Pending {
            return DomainError::Conflict(format!("booking is already {}", booking.status));
        }

        let available = sqlx::query_scalar::<_, i32>(
            "SELECT available_slots FROM packages WHERE id = $1",
        )
        .bind(booking.package_id)
        .fetch_optional(&self.pool)
        .await;

        match available {
            Ok(Some(available)) => DomainError::InsufficientCapacity {
                requested: booking.slots_booked,
                available,
            },
            Ok(None) => DomainError::NotFound("package"),
            Err(e) => DomainError::storage(e),
        }
    }
}
