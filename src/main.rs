use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use billr::api::routes::{create_router, AppState};
use billr::config::Config;
use billr::mapper::{Categorizer, UtbmsSeeds};
use billr::observability::{init_tracing, MetricsRegistry};
use billr::policy::NarrativeLinter;
use billr::storage::SqliteStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Initialize tracing
    init_tracing(&config.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting billr billing engine"
    );

    // Connect storage and bootstrap the schema
    let storage = SqliteStorage::connect(&config.db_url).await?;
    storage.init_schema().await?;
    info!(db = %config.db_url, "Storage ready");

    // Load UTBMS seed tables; an absent file leaves the categorizer
    // with empty tables (overrides still work)
    let seeds = match UtbmsSeeds::from_path(&config.seeds_path) {
        Ok(seeds) => seeds,
        Err(e) => {
            warn!(path = %config.seeds_path.display(), error = %e, "UTBMS seeds unavailable");
            UtbmsSeeds::default()
        }
    };

    // Create application state
    let listen_addr = config.listen_addr.clone();
    let graceful_shutdown = config.graceful_shutdown;
    let state = Arc::new(AppState {
        storage: Arc::new(storage),
        config,
        categorizer: Categorizer::new(seeds),
        linter: NarrativeLinter::new(),
        metrics: MetricsRegistry::new(),
        start_time: Instant::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    });

    // Create router
    let app = create_router(state);

    // Parse listen address
    let addr: SocketAddr = listen_addr.parse()?;

    info!(addr = %addr, "Starting HTTP server");

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    if graceful_shutdown {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        axum::serve(listener, app).await?;
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal");
}
