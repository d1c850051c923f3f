//! # Sightline Server
//!
//! Main entry point for the Sightline profile service.

use sightline_config::ConfigLoader;
use sightline_core::telemetry::{init_logging, LogFormat};
use sightline_core::{SightlineError, SightlineResult};
use sightline_server::app::{install_metrics_recorder, metrics_router, AppBuilder};
use axum::Router;
use sightline_server::startup::{config_summary, print_banner, print_startup_info};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("sightline-server: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> SightlineResult<()> {
    // Load configuration
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    init_logging(
        &config.observability.log_level,
        LogFormat::from_name(&config.observability.log_format),
    )?;

    print_banner();
    info!("Starting Sightline Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", config_summary(&config));

    let extra_routes = if config.observability.metrics_enabled {
        metrics_router(&config.observability.metrics_path, install_metrics_recorder()?)
    } else {
        Router::new()
    };

    let app = AppBuilder::new().with_config(config.clone()).build().await?;
    let router = app.router_with(extra_routes);

    let sweeper = app.spawn_cache_sweeper();

    let addr = config.server.addr();
    info!("Starting REST server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SightlineError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    print_startup_info(&config);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| SightlineError::Internal(format!("REST server error: {}", e)))?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    app.shutdown().await;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
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
