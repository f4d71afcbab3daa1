use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::actor::ActorRef;
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    BookingRequest,
    BookingConfirmed,
    BookingRejected,
    BookingCancelled,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationKind::Like => "LIKE",
            NotificationKind::Comment => "COMMENT",
            NotificationKind::Follow => "FOLLOW",
            NotificationKind::BookingRequest => "BOOKING_REQUEST",
            NotificationKind::BookingConfirmed => "BOOKING_CONFIRMED",
            NotificationKind::BookingRejected => "BOOKING_REJECTED",
            NotificationKind::BookingCancelled => "BOOKING_CANCELLED",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for NotificationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIKE" => Ok(NotificationKind::Like),
            "COMMENT" => Ok(NotificationKind::Comment),
            "FOLLOW" => Ok(NotificationKind::Follow),
            "BOOKING_REQUEST" => Ok(NotificationKind::BookingRequest),
            "BOOKING_CONFIRMED" => Ok(NotificationKind::BookingConfirmed),
            "BOOKING_REJECTED" => Ok(NotificationKind::BookingRejected),
            "BOOKING_CANCELLED" => Ok(NotificationKind::BookingCancelled),
            other => Err(DomainError::Storage(format!(
                "unknown notification kind: {}",
                other
            ))),
        }
    }
}

/// What `Notification.related_entity` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelatedEntityKind {
    Post,
    Comment,
    Tweet,
    Package,
    Follow,
    Booking,
}

impl fmt::Display for RelatedEntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelatedEntityKind::Post => "post",
            RelatedEntityKind::Comment => "comment",
            RelatedEntityKind::Tweet => "tweet",
            RelatedEntityKind::Package => "package",
            RelatedEntityKind::Follow => "follow",
            RelatedEntityKind::Booking => "booking",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RelatedEntityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(RelatedEntityKind::Post),
            "comment" => Ok(RelatedEntityKind::Comment),
            "tweet" => Ok(RelatedEntityKind::Tweet),
            "package" => Ok(RelatedEntityKind::Package),
            "follow" => Ok(RelatedEntityKind::Follow),
            "booking" => Ok(RelatedEntityKind::Booking),
            other => Err(DomainError::Storage(format!(
                "unknown related entity kind: {}",
                other
            ))),
        }
    }
}

/// A durable, recipient-addressed record of a single event. Immutable except
/// for `is_read`; removed only by explicit recipient action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient: ActorRef,
    pub sender: ActorRef,
    pub kind: NotificationKind,
    pub related_entity: Uuid,
    pub related_entity_kind: RelatedEntityKind,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        recipient: ActorRef,
        sender: ActorRef,
        kind: NotificationKind,
        related_entity: Uuid,
        related_entity_kind: RelatedEntityKind,
        message: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient,
            sender,
            kind,
            related_entity,
            related_entity_kind,
            message,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
