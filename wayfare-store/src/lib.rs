pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod directory;
pub mod edge_repo;
pub mod notification_repo;
pub mod package_repo;

pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
pub use directory::{PgActorDirectory, PgContentResolver};
pub use edge_repo::PgEdgeRepository;
pub use notification_repo::PgNotificationRepository;
pub use package_repo::PgPackageRepository;
