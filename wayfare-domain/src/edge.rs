use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::actor::ActorRef;
use crate::error::DomainError;

/// Kinds of content a like can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Post,
    Comment,
    Tweet,
    Package,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Post => write!(f, "post"),
            TargetKind::Comment => write!(f, "comment"),
            TargetKind::Tweet => write!(f, "tweet"),
            TargetKind::Package => write!(f, "package"),
        }
    }
}

impl FromStr for TargetKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(TargetKind::Post),
            "comment" => Ok(TargetKind::Comment),
            "tweet" => Ok(TargetKind::Tweet),
            "package" => Ok(TargetKind::Package),
            other => Err(DomainError::Validation(format!(
                "unknown like target kind: {}",
                other
            ))),
        }
    }
}

/// What a like edge points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LikeTarget {
    pub kind: TargetKind,
    pub id: Uuid,
}

/// A directed follow relationship, unique per ordered actor pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowEdge {
    pub id: Uuid,
    pub follower: ActorRef,
    pub following: ActorRef,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a presence toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleState {
    Added,
    Removed,
}
