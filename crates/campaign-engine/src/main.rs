//! Campaign Engine Server
//!
//! Serves workflow execution and execution history over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campaign_engine::{
    config::{AppConfig, DatabaseConfig, StorageBackend},
    db::{create_pool, ensure_schema},
    engine::{ActionDispatcher, WorkflowExecutor},
    router::build_router,
    state::AppState,
    store::{
        ExecutionStore, MemoryExecutionStore, MemoryWorkflowSource, PostgresStore, WorkflowSource,
    },
    workflow::parse_workflows,
};

/// Initialize tracing/logging.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,campaign_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the storage backends selected by configuration.
async fn open_storage(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn WorkflowSource>, Arc<dyn ExecutionStore>)> {
    match config.storage {
        StorageBackend::Memory => {
            let source = match &config.workflows_file {
                Some(path) => MemoryWorkflowSource::from_file(path)?,
                None => {
                    tracing::warn!("No workflows file configured, starting with no workflows");
                    MemoryWorkflowSource::new()
                }
            };
            let source: Arc<dyn WorkflowSource> = Arc::new(source);
            let store: Arc<dyn ExecutionStore> = Arc::new(MemoryExecutionStore::new());
            Ok((source, store))
        }
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to load database config, using defaults");
                DatabaseConfig::default()
            });

            let pool = create_pool(&db_config).await?;
            ensure_schema(&pool).await?;

            let store = Arc::new(PostgresStore::new(pool));
            if let Some(path) = &config.workflows_file {
                let content = std::fs::read_to_string(path)?;
                let workflows = parse_workflows(&content)?;
                for workflow in &workflows {
                    store.save(workflow).await?;
                }
                tracing::info!(path = %path, count = workflows.len(), "Seeded workflow definitions");
            }

            let source: Arc<dyn WorkflowSource> = store.clone();
            let store: Arc<dyn ExecutionStore> = store;
            Ok((source, store))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting campaign engine"
    );

    let app_config = AppConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load app config, using defaults");
        AppConfig::default()
    });

    tracing::info!(
        host = %app_config.host,
        port = app_config.port,
        debug = app_config.debug,
        storage = %app_config.storage,
        "Configuration loaded"
    );

    let (source, store) = open_storage(&app_config).await?;

    let dispatcher = ActionDispatcher::new(app_config.http_timeout());
    let executor = WorkflowExecutor::new(Arc::new(dispatcher));

    let state = AppState::new(app_config.clone(), source, store, executor);
    let app = build_router(state);

    let addr: SocketAddr = app_config.bind_address().parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
