//! Clinic Bookings Server
//!
//! A REST API for creating, listing, searching, updating and deleting
//! clinic bookings.

use clinic_bookings::config::Config;
use clinic_bookings::db::BookingDb;
use clinic_bookings::router::create_router;
use clinic_bookings::state::AppState;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    let db = BookingDb::new(&config.database.url, config.database.max_connections)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open database: {}", e))?;

    if let Some(seed_file) = &config.database.seed_file {
        match db.load_directory_seed(seed_file).await {
            Ok((employees, services)) => info!(
                "Loaded {} employees and {} services from {}",
                employees,
                services,
                seed_file.display()
            ),
            Err(e) => tracing::warn!("Failed to load seed file: {}", e),
        }
    }

    let app = create_router(AppState::new(db), &config.server.base_path);

    // Bind to address from config
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    info!("Server running on http://{}{}", addr, config.server.base_path);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Setup graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}
