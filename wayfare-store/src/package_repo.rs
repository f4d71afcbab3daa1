use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use wayfare_domain::repository::PackageRepository;
use wayfare_domain::{DomainError, TravelPackage};

pub struct PgPackageRepository {
    pool: PgPool,
}

impl PgPackageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PackageRow {
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

impl From<PackageRow> for TravelPackage {
    fn from(row: PackageRow) -> Self {
        TravelPackage {
            id: row.id,
            agency_id: row.agency_id,
            title: row.title,
            description: row.description,
            price: row.price,
            start_date: row.start_date,
            end_date: row.end_date,
            max_slots: row.max_slots,
            available_slots: row.available_slots,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) const PACKAGE_COLUMNS: &str = "id, agency_id, title, description, price, start_date, \
     end_date, max_slots, available_slots, is_active, created_at, updated_at";

#[async_trait]
impl PackageRepository for PgPackageRepository {
    async fn insert(&self, package: &TravelPackage) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO packages (id, agency_id, title, description, price, start_date, end_date,
                                  max_slots, available_slots, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(package.id)
        .bind(package.agency_id)
        .bind(&package.title)
        .bind(&package.description)
        .bind(package.price)
        .bind(package.start_date)
        .bind(package.end_date)
        .bind(package.max_slots)
        .bind(package.available_slots)
        .bind(package.is_active)
        .bind(package.created_at)
        .bind(package.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<TravelPackage>, DomainError> {
        let row = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {} FROM packages WHERE id = $1",
            PACKAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::storage)?;

        Ok(row.map(TravelPackage::from))
    }
}
