//! workcycle server binary.
//!
//! Loads configuration, connects to PostgreSQL, wires the work handlers to
//! their adapters and serves the HTTP API until interrupted.

use std::sync::Arc;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use workcycle::adapters::http::{api_router, WorkHandlers};
use workcycle::adapters::{PostgresWorkPeriodStore, PostgresWorkReader};
use workcycle::application::{
    GeneratePeriodsHandler, PreviewPeriodHandler, UpdatePeriodStatusHandler,
};
use workcycle::config::{AppConfig, ServerConfig};
use workcycle::ports::{WorkPeriodStore, WorkReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let addr = config.server.socket_addr()?;

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    let work_reader: Arc<dyn WorkReader> = Arc::new(PostgresWorkReader::new(pool.clone()));
    let store: Arc<dyn WorkPeriodStore> = Arc::new(PostgresWorkPeriodStore::new(pool));

    let handlers = WorkHandlers::new(
        Arc::new(GeneratePeriodsHandler::new(
            work_reader.clone(),
            store.clone(),
            config.generation.retry_backoff(),
        )),
        Arc::new(PreviewPeriodHandler::new(
            work_reader,
            config.generation.preview_window_count,
        )),
        Arc::new(UpdatePeriodStatusHandler::new(store)),
    );

    let app = api_router(handlers)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        "workcycle listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("workcycle stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
