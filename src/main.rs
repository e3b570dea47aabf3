//! ShiftGuard Server — Time-Compliance Enforcement Engine
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use shiftguard_api::{AppState, build_router};
use shiftguard_core::config::AppConfig;
use shiftguard_core::error::AppError;
use shiftguard_database::DatabasePool;
use shiftguard_worker::CronScheduler;

#[tokio::main]
async fn main() {
    let env = std::env::var("SHIFTGUARD_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ShiftGuard v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    shiftguard_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Wire repositories and engine services ────────────
    let config = Arc::new(config);
    let state = AppState::new(Arc::clone(&config), db.pool().clone());

    // ── Step 3: Start the safety-net scheduler ───────────────────
    let mut scheduler = if config.worker.enabled {
        let cron = CronScheduler::new(Arc::clone(&state.safety_net)).await?;
        cron.register_safety_net(&config.worker.safety_net_cron)
            .await?;
        cron.start().await?;
        Some(cron)
    } else {
        tracing::warn!("Worker disabled; unadjusted periods will not be swept automatically");
        None
    };

    // ── Step 4: Build and start HTTP server ──────────────────────
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("ShiftGuard server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 5: Stop background tasks ────────────────────────────
    if let Some(cron) = scheduler.as_mut() {
        cron.shutdown().await?;
    }
    db.close().await;

    tracing::info!("ShiftGuard server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
