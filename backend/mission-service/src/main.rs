/// Mission Service - HTTP Server
///
/// Serves the Volontär mission API: registration, login, missions,
/// sign-ups and organization profiles.
use actix_middleware::CorrelationIdMiddleware;
use actix_web::{web, App, HttpServer};
use crypto_core::jwt;
use mission_service::clock::{Clock, SystemClock};
use mission_service::config::{StorageBackend, SERVICE_NAME};
use mission_service::repository::{InMemoryStore, PgStore, Repositories};
use mission_service::{handlers, logging, seed, AppState, Config};
use std::io;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{context}: {err}"))
}

async fn seed_if_enabled(config: &Config, repos: Repositories, clock: &dyn Clock) -> io::Result<()> {
    if !config.seed_demo_data {
        return Ok(());
    }
    seed::seed_demo_data(&repos, clock)
        .await
        .map_err(|e| startup_error("Failed to seed demo data", e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing();

    let config = Config::from_env()
        .map_err(|e| startup_error("Failed to load configuration", format!("{e:#}")))?;

    jwt::initialize_jwt_keys(&config.jwt.private_key_pem, &config.jwt.public_key_pem)
        .map_err(|e| startup_error("Failed to initialize JWT keys", e))?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let bind_address = format!("{}:{}", config.app.host, config.app.port);

    let state = match config.storage {
        StorageBackend::Postgres => {
            let db_config = config
                .database
                .clone()
                .ok_or_else(|| startup_error("Configuration", "database settings missing"))?;
            db_config.log_config();

            let pool = db_pool::create_pool(db_config)
                .await
                .map_err(|e| startup_error("Failed to connect to database", e))?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| startup_error("Failed to run migrations", e))?;
            info!("Database migrations applied");

            let store = Arc::new(PgStore::new(pool.clone()));
            seed_if_enabled(&config, Repositories::from_store(store.clone()), clock.as_ref()).await?;
            AppState::new(store, clock, config, Some(pool))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data will not survive a restart");
            let store = Arc::new(InMemoryStore::new());
            seed_if_enabled(&config, Repositories::from_store(store.clone()), clock.as_ref()).await?;
            AppState::new(store, clock, config, None)
        }
    };

    info!(
        service = SERVICE_NAME,
        env = %state.config.app.env,
        address = %bind_address,
        "Starting HTTP server"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(handlers::json_config())
            .app_data(handlers::path_config())
            .wrap(CorrelationIdMiddleware)
            .wrap(TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    info!("Mission service shutting down");
    Ok(())
}
