//! Service binary for the Petgarden garden.
//!
//! Loads configuration and the catch catalog, connects the durable and
//! session stores, and builds the [`GardenService`] the request layer
//! drives. Runs until interrupted.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `petgarden-config.yaml` (or `$PETGARDEN_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Validate garden settings
//! 4. Load the catch catalog
//! 5. Connect to `PostgreSQL` and run migrations
//! 6. Connect to `Dragonfly`
//! 7. Build the garden service
//! 8. Wait for Ctrl-C, then close connections

mod error;

use std::sync::Arc;
use std::time::Duration;

use petgarden_core::{GardenService, ServiceConfig};
use petgarden_db::{DragonflyPool, GardenStore, PostgresConfig, PostgresPool, SessionStore};
use petgarden_garden::StaticCatalog;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("petgarden-engine starting");
    if from_file {
        info!(path = %ServiceConfig::path_from_env().display(), "Configuration loaded");
    } else {
        info!("Config file not found, using defaults");
    }

    // 3. Validate garden settings.
    let settings = config.garden.settings().map_err(EngineError::from)?;
    info!(
        growth_seconds = settings.growth.seconds(),
        palette_size = settings.palette.len(),
        "Garden settings validated"
    );

    // 4. Load the catch catalog.
    let catalog = StaticCatalog::from_file(&config.catalog.path).map_err(EngineError::from)?;

    // 5. Connect to PostgreSQL.
    let postgres_config = PostgresConfig::from_infrastructure(&config.infrastructure);
    let postgres = PostgresPool::connect(&postgres_config)
        .await
        .map_err(EngineError::from)?;
    postgres.run_migrations().await.map_err(EngineError::from)?;

    // 6. Connect to Dragonfly.
    let dragonfly = DragonflyPool::connect(&config.infrastructure.dragonfly_url)
        .await
        .map_err(EngineError::from)?;
    let ttl = Duration::from_secs(config.session.pending_catch_ttl_seconds);

    // 7. Build the garden service.
    let service = Arc::new(GardenService::new(
        GardenStore::new(postgres.pool().clone()),
        SessionStore::new(&dragonfly, ttl),
        Arc::new(catalog),
        settings,
    ));
    info!(
        pending_catch_ttl_seconds = ttl.as_secs(),
        growth_seconds = service.settings().growth.seconds(),
        "Garden service ready"
    );

    // 8. Run until interrupted.
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| EngineError::Signal {
            message: format!("{e}"),
        })?;
    info!("Shutdown signal received");

    drop(service);
    postgres.close().await;
    dragonfly.close().await.map_err(EngineError::from)?;

    info!("petgarden-engine stopped");
    Ok(())
}

/// Load configuration from the configured path.
///
/// Returns defaults (with environment overrides) if the file does not
/// exist. The flag reports whether the file was read.
fn load_config() -> Result<(ServiceConfig, bool), EngineError> {
    let config_path = ServiceConfig::path_from_env();
    if config_path.exists() {
        Ok((ServiceConfig::from_file(&config_path)?, true))
    } else {
        let mut config = ServiceConfig::default();
        config.infrastructure.apply_env_overrides();
        Ok((config, false))
    }
}
