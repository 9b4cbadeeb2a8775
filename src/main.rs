//! Pacer Backend Service
//!
//! Main entry point for the Pacer group training tracker backend.
//! This service provides:
//! - REST API for groups, members, messages, training and progress
//! - Background task for weekly spreadsheet sync

use pacer_backend::api::{self, ApiContext};
use pacer_backend::config::AppConfig;
use pacer_backend::database::{create_pool, run_migrations};
use pacer_backend::error::{AppError, AppResult};
use pacer_backend::services::{
    GroupService, ProgressService, SpreadsheetService, TrainingService,
};
use pacer_backend::AppState;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    // Initialize tracing/logging with config
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("pacer_backend={},sqlx=warn,tower_http=info", config.log_level).into()
            }),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           Pacer Backend Service Starting                  ║");
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);
    info!("HTTP port: {}", config.http_port);

    // =========================================================================
    // DATABASE SETUP
    // =========================================================================
    info!("Connecting to database...");

    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        AppError::Database(e)
    })?;

    info!("Database connection pool created successfully");
    info!("Max connections: {}", config.database.max_connections);

    // Run migrations
    info!("Running database migrations...");
    run_migrations(&pool, None).await.map_err(|e| {
        error!("Database migration failed: {}", e);
        AppError::Database(e)
    })?;

    info!("Database migrations completed successfully");

    // =========================================================================
    // CORE SERVICES INITIALIZATION
    // =========================================================================
    info!("Initializing core services...");

    // Initialize application state with repositories
    let app_state = Arc::new(AppState::new(pool.clone()));
    info!("✓ Application state initialized with repositories");

    let group_service = Arc::new(GroupService::new(
        app_state.group_repo.clone(),
        app_state.user_repo.clone(),
        app_state.group_member_repo.clone(),
        app_state.group_message_repo.clone(),
    ));
    info!("✓ Group service initialized");

    let progress_service = Arc::new(ProgressService::new(
        app_state.group_repo.clone(),
        app_state.user_repo.clone(),
        app_state.user_data_repo.clone(),
    ));
    info!("✓ Progress service initialized");

    let training_service = Arc::new(TrainingService::new(
        app_state.user_repo.clone(),
        app_state.user_data_repo.clone(),
    ));
    info!("✓ Training service initialized");

    let spreadsheet_service = Arc::new(SpreadsheetService::new(
        app_state.group_repo.clone(),
        app_state.group_member_repo.clone(),
        app_state.user_repo.clone(),
        app_state.user_data_repo.clone(),
        config.sheets.clone(),
    ));
    match &config.sheets.push_url {
        Some(url) => info!("✓ Spreadsheet service initialized (pushing to {})", url),
        None => info!("✓ Spreadsheet service initialized (push disabled)"),
    }

    // =========================================================================
    // BACKGROUND TASKS
    // =========================================================================

    // Start sheet sync in background, when an interval is configured
    let sheets_handle = if let Some(interval) = config.sheets.sync_interval() {
        let service = spreadsheet_service.clone();
        let handle = tokio::spawn(async move {
            service.start_sync(interval).await;
        });
        info!("✓ Sheet sync background task started ({:?} interval)", interval);
        Some(handle)
    } else {
        warn!("SHEETS_SYNC_INTERVAL_SECS not configured - sheet sync not started");
        None
    };

    // =========================================================================
    // START SERVER
    // =========================================================================

    let ctx = Arc::new(ApiContext {
        auth_secret: config.auth_secret.clone(),
        user_repo: app_state.user_repo.clone(),
        group_service,
        progress_service,
        training_service,
        spreadsheet_service,
    });

    let http_port = config.http_port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = api::start_server(ctx, http_port).await {
            error!("API server error: {}", e);
        }
    });

    // =========================================================================
    // READY
    // =========================================================================
    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           Pacer Backend Service Ready!                    ║");
    info!("╠══════════════════════════════════════════════════════════╣");
    info!("║  REST API:     0.0.0.0:{}                              ║", config.http_port);
    info!("║  Environment:  {}                                    ║", config.environment);
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Press Ctrl+C to shutdown gracefully");

    // =========================================================================
    // SHUTDOWN HANDLING
    // =========================================================================
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down gracefully...");
        }
        _ = server_handle => {
            error!("API server exited unexpectedly");
        }
        _ = async {
            if let Some(handle) = sheets_handle {
                handle.await.ok();
            } else {
                // Never completes if sheet sync is not running
                futures::future::pending::<()>().await;
            }
        } => {
            error!("Sheet sync task exited unexpectedly");
        }
    }

    info!("Pacer backend service shutdown complete");
    Ok(())
}
