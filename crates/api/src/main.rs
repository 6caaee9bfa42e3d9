use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use domain::services::template_save::TemplateSaver;
use invitation_api::app::{create_app, AppState};
use invitation_api::config::Config;
use invitation_api::jobs::{JobScheduler, PoolMetricsJob, TemplateSyncJob};
use invitation_api::middleware::{init_metrics, logging::init_logging};
use persistence::local_store::FileLocalStore;
use persistence::repositories::CustomTemplateRepository;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load().context("loading configuration")?;
    init_logging(&config.logging).context("initializing logging")?;
    init_metrics().context("installing metrics recorder")?;

    info!("Starting invitation API v{}", env!("CARGO_PKG_VERSION"));

    let jwt = config.jwt.build().context("building JWT validator")?;

    // Lazy: the server starts and saves templates locally while the database is down
    let pool = persistence::db::create_lazy_pool(&config.database.pool_config())
        .context("creating database pool")?;

    if config.database.provision_on_startup {
        match persistence::schema::ensure_schema(&pool, config.database.provision_options()).await
        {
            Ok(Some(report)) => info!(steps = report.steps.len(), "Database schema provisioned"),
            Ok(None) => {}
            Err(e) => error!(error = %e, "Database provisioning failed, continuing without it"),
        }
    }

    let local_store = FileLocalStore::open(&config.storage.local_dir)
        .await
        .context("opening local template store")?;
    info!(dir = %local_store.dir().display(), "Local template store ready");

    let saver = TemplateSaver::new(
        Arc::new(CustomTemplateRepository::new(pool.clone())),
        Arc::new(local_store),
    );

    let mut scheduler = JobScheduler::new();
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    if config.sync.enabled {
        scheduler.register(TemplateSyncJob::new(saver.clone(), config.sync.interval_secs));
    } else {
        warn!("Local template sync disabled");
    }
    scheduler.start();

    let addr = config.socket_addr()?;
    let app = create_app(AppState::new(config, jwt, pool, saver));

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
