use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::inventory::SlotInventory;

/// A travel package published by an agency, with a finite slot pool.
/// `available_slots` is only ever mutated through the inventory operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelPackage {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_slots: i32,
    pub available_slots: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TravelPackage {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        agency_id: Uuid,
        title: String,
        description: String,
        price: i64,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        max_slots: i32,
    ) -> Result<Self, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::Validation("title is required".to_string()));
        }
        if price < 0 {
            return Err(DomainError::Validation(
                "price must not be negative".to_string(),
            ));
        }
        if start_date >= end_date {
            return Err(DomainError::Validation(
                "end date must be after start date".to_string(),
            ));
        }
        let inventory = SlotInventory::new(max_slots)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            agency_id,
            title,
            description,
            price,
            start_date,
            end_date,
            max_slots: inventory.max_slots,
            available_slots: inventory.available_slots,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn inventory(&self) -> SlotInventory {
        SlotInventory {
            max_slots: self.max_slots,
            available_slots: self.available_slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc::now() + Duration::days(7);
        (start, start + Duration::days(14))
    }

    #[test]
    fn new_package_starts_fully_available() {
        let (start, end) = window();
        let pkg = TravelPackage::new(
            Uuid::new_v4(),
            "Coastal loop".to_string(),
            "Ten days along the coast".to_string(),
            149_900,
            start,
            end,
            12,
        )
        .unwrap();
        assert_eq!(pkg.available_slots, pkg.max_slots);
        assert!(pkg.is_active);
    }

    #[test]
    fn inverted_date_window_rejected() {
        let (start, end) = window();
        let err = TravelPackage::new(
            Uuid::new_v4(),
            "Backwards".to_string(),
            String::new(),
            100,
            end,
            start,
            4,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
