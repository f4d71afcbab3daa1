use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Slot capacity counters for a package. The Postgres repository enforces the
/// same rules with conditional UPDATEs; this type is the single place the
/// arithmetic is written down, and what the in-memory test stores run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInventory {
    pub max_slots: i32,
    pub available_slots: i32,
}

impl SlotInventory {
    /// A freshly created package starts fully available.
    pub fn new(max_slots: i32) -> Result<Self, DomainError> {
        if max_slots < 1 {
            return Err(DomainError::Validation(
                "max_slots must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_slots,
            available_slots: max_slots,
        })
    }

    /// Take `slots` out of the pool. Rejected before any mutation when the
    /// pool is too small; `available_slots` never goes negative.
    pub fn reserve(&mut self, slots: i32) -> Result<(), DomainError> {
        if slots < 1 {
            return Err(DomainError::Validation(
                "slot count must be at least 1".to_string(),
            ));
        }
        if slots > self.available_slots {
            return Err(DomainError::InsufficientCapacity {
                requested: slots,
                available: self.available_slots,
            });
        }
        self.available_slots -= slots;
        Ok(())
    }

    /// Return `slots` to the pool. Exceeding `max_slots` means the caller
    /// released twice; that is an invariant breach and is returned as an
    /// error, never silently clamped.
    pub fn release(&mut self, slots: i32) -> Result<(), DomainError> {
        if slots < 1 {
            return Err(DomainError::Validation(
                "slot count must be at least 1".to_string(),
            ));
        }
        if self.available_slots + slots > self.max_slots {
            return Err(DomainError::CapacityOverflow {
                slots,
                max_slots: self.max_slots,
            });
        }
        self.available_slots += slots;
        Ok(())
    }
}
