use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DomainError;

/// The two kinds of account that can act on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorType {
    Traveler,
    Agency,
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorType::Traveler => write!(f, "Traveler"),
            ActorType::Agency => write!(f, "Agency"),
        }
    }
}

impl FromStr for ActorType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Traveler" => Ok(ActorType::Traveler),
            "Agency" => Ok(ActorType::Agency),
            other => Err(DomainError::Validation(format!(
                "unknown actor type: {}",
                other
            ))),
        }
    }
}

/// Discriminated reference to a traveler or an agency. Every document that
/// points at "a user" carries one of these instead of guessing which table
/// the id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorRef {
    pub actor_type: ActorType,
    pub actor_id: Uuid,
}

impl ActorRef {
    pub fn traveler(actor_id: Uuid) -> Self {
        Self {
            actor_type: ActorType::Traveler,
            actor_id,
        }
    }

    pub fn agency(actor_id: Uuid) -> Self {
        Self {
            actor_type: ActorType::Agency,
            actor_id,
        }
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.actor_type, self.actor_id)
    }
}

/// Public identity summary joined onto followers/following listings and
/// booking details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorProfile {
    pub actor: ActorRef,
    pub user_name: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}
