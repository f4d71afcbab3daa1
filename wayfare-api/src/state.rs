use std::sync::Arc;

use wayfare_domain::repository::PackageRepository;
use wayfare_engine::{BookingService, NotificationService, SocialService};

/// Token verification material. Issuance lives with the external credential
/// service, so only the shared secret is needed here.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<BookingService>,
    pub social: Arc<SocialService>,
    pub notifications: Arc<NotificationService>,
    pub packages: Arc<dyn PackageRepository>,
    pub auth: AuthConfig,
}
