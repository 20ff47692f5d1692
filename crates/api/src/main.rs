use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use setcrm_api::background::heartbeat_retention;
use setcrm_api::config::{LogFormat, ServerConfig};
use setcrm_api::router::build_app_router;
use setcrm_api::state::AppState;
use setcrm_db::store::{StoreBackend, Stores};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid configuration")?;

    // --- Tracing ---
    init_tracing(config.log_format);
    tracing::info!(
        host = %config.host,
        port = config.port,
        store = %config.store_backend,
        "Loaded server configuration"
    );

    // --- Storage ---
    let stores = build_stores(&config).await?;

    // --- Background jobs ---
    let cancel = CancellationToken::new();
    let retention_handle = (config.heartbeat_retention_days > 0).then(|| {
        tokio::spawn(heartbeat_retention::run(
            Arc::clone(&stores.heartbeats),
            config.heartbeat_retention_days,
            cancel.clone(),
        ))
    });

    // --- Router ---
    let host: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    let app = build_app_router(AppState::new(stores, config));

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    if let Some(handle) = retention_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Heartbeat retention job stopped");
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

const DEFAULT_LOG_FILTER: &str = "setcrm_api=debug,setcrm_db=debug,tower_http=debug";

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let registry = tracing_subscriber::registry().with(filter);
    let fmt_layer = tracing_subscriber::fmt::layer();
    match format {
        LogFormat::Json => registry.with(fmt_layer.json()).init(),
        LogFormat::Pretty => registry.with(fmt_layer).init(),
    }
}

/// Connect the configured backend. The memory backend starts with demo data.
async fn build_stores(config: &ServerConfig) -> anyhow::Result<Stores> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store with demo data");
            Ok(Stores::seeded_memory(Utc::now()))
        }
        StoreBackend::MySql => {
            let db = &config.database;
            let pool = setcrm_db::create_pool(
                &db.url,
                db.max_connections,
                Duration::from_secs(db.acquire_timeout_secs),
            )
            .await
            .context("Failed to connect to database")?;
            tracing::info!("Database connection pool created");

            setcrm_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            tracing::info!("Database health check passed");

            if db.run_migrations {
                setcrm_db::run_migrations(&pool)
                    .await
                    .context("Failed to run database migrations")?;
                tracing::info!("Database migrations applied");
            }

            Ok(Stores::mysql(pool))
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
