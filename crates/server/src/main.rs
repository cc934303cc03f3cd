use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use titlerank_core::{load_config, validate_config, FleetClient, ReleaseSource, TorrentActions};
use titlerank_server::api::create_router;
use titlerank_server::poller::SnapshotPoller;
use titlerank_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("TITLERANK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!(
        "Upgrade tolerance: {} points",
        config.engine.upgrade_tolerance
    );

    // Create fleet client if configured
    let (source, actions, poll_interval): (
        Option<Arc<dyn ReleaseSource>>,
        Option<Arc<dyn TorrentActions>>,
        Option<Duration>,
    ) = match &config.upstream {
        Some(upstream) => {
            info!(
                "Initializing fleet client at {} (instance: {})",
                upstream.url, upstream.instance_id
            );
            let client = Arc::new(
                FleetClient::new(upstream.clone()).context("Failed to create fleet client")?,
            );
            (
                Some(Arc::clone(&client) as Arc<dyn ReleaseSource>),
                Some(client as Arc<dyn TorrentActions>),
                Some(Duration::from_secs(upstream.poll_interval_secs)),
            )
        }
        None => {
            info!("No upstream configured, serving an empty collection");
            (None, None, None)
        }
    };

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), source, actions));

    // Start polling
    let poller = poll_interval.map(|interval| {
        let poller = SnapshotPoller::new(Arc::clone(&state), interval);
        poller.start();
        poller
    });

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    if let Some(poller) = poller {
        poller.stop();
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
