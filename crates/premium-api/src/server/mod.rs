//! Server setup and initialization
//!
//! Wires the ledger backend and directory into a service context, builds
//! the router, and runs it next to the expiry reconciler.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use premium_common::{AppConfig, AppError, LedgerBackend};
use premium_db::{
    create_pool, run_migrations, MemoryLedger, PgCodeRepository, PgEntitlementRepository,
    PgLedgerHealth, PgVoteRepository,
};
use premium_directory::DiscordDirectory;
use premium_service::{ExpiryReconciler, ServiceContextBuilder, ServiceSettings};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_rate_limit_and_cors};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_rate_limit_and_cors(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );

    let router = health_routes().merge(api);
    apply_middleware(router).with_state(state)
}

/// Attach the configured ledger backend to the builder
async fn with_ledger(
    builder: ServiceContextBuilder,
    config: &AppConfig,
) -> Result<ServiceContextBuilder, AppError> {
    match config.ledger.backend {
        LedgerBackend::Postgres => {
            let db = config.database.as_ref().ok_or_else(|| {
                AppError::Config("DATABASE_URL is required for the postgres ledger".into())
            })?;

            info!("Connecting to PostgreSQL...");
            let pool = create_pool(db)
                .await
                .map_err(|e| AppError::LedgerUnavailable(e.to_string()))?;
            info!("PostgreSQL connection established");

            if db.run_migrations {
                run_migrations(&pool)
                    .await
                    .map_err(|e| AppError::Config(format!("Migration failed: {e}")))?;
                info!("Ledger migrations applied");
            }

            Ok(builder
                .code_repo(Arc::new(PgCodeRepository::new(pool.clone())))
                .entitlement_repo(Arc::new(PgEntitlementRepository::new(pool.clone())))
                .vote_repo(Arc::new(PgVoteRepository::new(pool.clone())))
                .ledger_health(Arc::new(PgLedgerHealth::new(pool))))
        }
        LedgerBackend::Memory => {
            warn!("Using the in-memory ledger; all data is lost on restart");
            Ok(builder.ledger(Arc::new(MemoryLedger::new())))
        }
    }
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let directory = DiscordDirectory::new(&config.discord)
        .map_err(|e| AppError::Config(format!("Discord client: {e}")))?;

    let builder = ServiceContextBuilder::new()
        .directory(Arc::new(directory))
        .settings(ServiceSettings::from_config(&config));

    let service_context = with_ledger(builder, &config)
        .await?
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Start the background expiry reconciler for this state
pub fn spawn_reconciler(state: &AppState, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "Starting expiry reconciler");
    ExpiryReconciler::new(state.service_context().clone()).spawn(interval)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C"),
        () = terminate => info!("Received SIGTERM"),
    }
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();
    let interval = config.reconciler.interval();

    let state = create_app_state(config).await?;
    let reconciler = spawn_reconciler(&state, interval);

    let app = create_app(state);
    let result = run_server(app, &addr).await;

    reconciler.abort();
    result
}
