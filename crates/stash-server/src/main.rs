//! # Stash Server
//!
//! Entry point: loads configuration, prepares the store and cache, and serves HTTP
//! until Ctrl+C or SIGTERM.

use stash_config::{AppConfig, ConfigLoader, ObservabilityConfig};
use stash_core::{StashError, StashResult};
use stash_repository::{create_pool, DatabasePoolInterface};
use stash_rest::{create_router, AppState, MetricsEndpoint};
use stash_server::{di, startup, telemetry};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            telemetry::init_logging(&ObservabilityConfig::default());
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    telemetry::init_logging(&config.observability);

    info!("Starting Stash Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

fn load_config() -> StashResult<AppConfig> {
    let config_loader = ConfigLoader::from_default_location()?;
    Ok(config_loader.get().clone())
}

async fn run(config: AppConfig) -> StashResult<()> {
    startup::print_banner();
    info!("Environment: {}", config.app.environment);

    // Store first: the seed must exist before the first lookup.
    let db_pool = create_pool(&config.database).await?;
    db_pool.run_migrations().await?;

    let services = di::build_services(&config, &db_pool)?;

    let metrics = if config.observability.metrics_enabled {
        Some(MetricsEndpoint {
            path: config.observability.metrics_path.clone(),
            handle: telemetry::install_metrics_recorder()?,
        })
    } else {
        None
    };

    let app_state = AppState::new(services.user_lookup.clone())
        .with_strict_not_found(config.server.strict_not_found);
    let router = create_router(app_state, &config.server, metrics);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StashError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    startup::print_startup_info(&config);
    info!("Starting REST server on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StashError::Internal(format!("REST server error: {}", e)))?;

    services.database_pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
