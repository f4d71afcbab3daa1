use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wayfare_api::{
    app,
    state::{AppState, AuthConfig},
};
use wayfare_engine::{BookingService, NotificationService, SocialService};
use wayfare_store::{
    DbClient, PgActorDirectory, PgBookingRepository, PgContentResolver, PgEdgeRepository,
    PgNotificationRepository, PgPackageRepository,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfare_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = wayfare_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Wayfare API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let packages = Arc::new(PgPackageRepository::new(db.pool.clone()));
    let bookings = Arc::new(PgBookingRepository::new(db.pool.clone()));
    let edges = Arc::new(PgEdgeRepository::new(db.pool.clone()));
    let directory = Arc::new(PgActorDirectory::new(db.pool.clone()));
    let content = Arc::new(PgContentResolver::new(db.pool.clone()));
    let notification_repo = Arc::new(PgNotificationRepository::new(db.pool.clone()));

    let notifier = Arc::new(NotificationService::new(notification_repo));
    let booking_service = Arc::new(BookingService::new(
        bookings,
        packages.clone(),
        notifier.clone(),
    ));
    let social_service = Arc::new(SocialService::new(
        edges,
        directory,
        content,
        notifier.clone(),
    ));

    let state = AppState {
        bookings: booking_service,
        social: social_service,
        notifications: notifier,
        packages,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app(state))
        .await
        .expect("Server error");
}
