use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DomainError;

/// Booking lifecycle states. `Pending` is the only non-terminal state;
/// `Confirmed` and `Cancelled` admit no further transitions (deleting a
/// Confirmed booking releases its slots, but that is a side effect of
/// removal, not a transition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "Pending"),
            BookingStatus::Confirmed => write!(f, "Confirmed"),
            BookingStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(BookingStatus::Pending),
            "Confirmed" => Ok(BookingStatus::Confirmed),
            "Cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(DomainError::Storage(format!(
                "unknown booking status: {}",
                other
            ))),
        }
    }
}

/// A traveler's slot request against a package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub traveler_id: Uuid,
    pub package_id: Uuid,
    pub slots_booked: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(traveler_id: Uuid, package_id: Uuid, slots_booked: i32) -> Result<Self, DomainError> {
        if slots_booked < 1 {
            return Err(DomainError::Validation(
                "slots_booked must be at least 1".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            traveler_id,
            package_id,
            slots_booked,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Guard used by accept/reject before any store write.
    pub fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::Conflict(format!(
                "booking is already {}",
                self.status
            )));
        }
        Ok(())
    }
}

/// Read model for `GET /bookings/{id}`: the booking joined with its traveler
/// and package summaries.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetails {
    pub booking: Booking,
    pub traveler_name: String,
    pub traveler_user_name: String,
    pub package_title: String,
    pub package_agency_id: Uuid,
}
