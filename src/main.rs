//! Solara PMS entry point
//!
//! Hotel reservation booking and availability service.
//! Reads configuration from TOML file (~/.config/solara-pms/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

use solara_pms::application::ports::NoopNotifier;
use solara_pms::application::{
    AvailabilityService, BookingOrchestrator, ClientResolver, ReservationLifecycle,
};
use solara_pms::config::AppConfig;
use solara_pms::domain::{ClientRepository, ReservationRepository, RoomRepository};
use solara_pms::infrastructure::database::migrator::Migrator;
use solara_pms::infrastructure::{
    SeaOrmClientRepository, SeaOrmReservationRepository, SeaOrmRoomRepository,
};
use solara_pms::{create_api_router, default_config_path, init_database, AppState, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("SOLARA_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Solara PMS...");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Repositories & services ────────────────────────────────
    let rooms: Arc<dyn RoomRepository> = Arc::new(SeaOrmRoomRepository::new(db.clone()));
    let clients: Arc<dyn ClientRepository> = Arc::new(SeaOrmClientRepository::new(db.clone()));
    let reservations: Arc<dyn ReservationRepository> =
        Arc::new(SeaOrmReservationRepository::new(db.clone()));

    let availability = Arc::new(AvailabilityService::new(
        rooms.clone(),
        reservations.clone(),
    ));
    let lifecycle = Arc::new(ReservationLifecycle::new(
        reservations.clone(),
        rooms.clone(),
        app_cfg.booking.clone(),
        Arc::new(NoopNotifier),
    ));
    let orchestrator = Arc::new(BookingOrchestrator::new(
        AvailabilityService::new(rooms.clone(), reservations.clone()),
        ClientResolver::new(clients.clone()),
        lifecycle.clone(),
        clients.clone(),
        rooms.clone(),
    ));

    let state = AppState {
        rooms,
        clients,
        reservations,
        availability,
        pricing: lifecycle.pricing().clone(),
        lifecycle,
        orchestrator,
    };

    // ── HTTP server ────────────────────────────────────────────
    let router = create_api_router(state);
    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!("Failed to listen for shutdown signal: {}", e),
            }
        })
        .await?;

    info!("Solara PMS stopped");
    Ok(())
}
