//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and Axum server lifecycle.

use crate::application::services::{LeadService, NetworkEventService, RedirectService};
use crate::config::Config;
use crate::domain::visit_queue::{VisitDispatcher, VisitMetrics};
use crate::domain::visit_worker::run_visit_worker;
use crate::infrastructure::cache::CandidateCache;
use crate::infrastructure::persistence::{
    PgCandidateRepository, PgLeadRepository, PgNetworkEventRepository, PgVisitRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// How long shutdown waits for queued visits to be written.
const VISIT_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Candidate cache
/// - Background visit worker
/// - Axum HTTP server
///
/// On `Ctrl+C` / `SIGTERM` the server stops accepting connections, then waits
/// up to [`VISIT_DRAIN_TIMEOUT`] for the visit queue to drain.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let pool = Arc::new(pool);
    let candidate_repository = Arc::new(PgCandidateRepository::new(pool.clone()));
    let visit_repository = Arc::new(PgVisitRepository::new(pool.clone()));
    let lead_repository = Arc::new(PgLeadRepository::new(pool.clone()));
    let network_event_repository = Arc::new(PgNetworkEventRepository::new(pool.clone()));

    let metrics = Arc::new(VisitMetrics::new());
    let (visits, visit_rx) = VisitDispatcher::channel(config.visit_queue_capacity, metrics.clone());

    let worker = tokio::spawn(run_visit_worker(
        visit_rx,
        visit_repository,
        metrics,
        config.visit_worker(),
    ));
    tracing::info!("Visit worker started");

    let cache = Arc::new(CandidateCache::new(config.candidate_cache_ttl()));

    let state = AppState {
        redirect_service: Arc::new(RedirectService::new(
            candidate_repository,
            cache,
            visits.clone(),
        )),
        lead_service: Arc::new(LeadService::new(lead_repository)),
        network_event_service: Arc::new(NetworkEventService::new(network_event_repository)),
        visits,
        behind_proxy: config.behind_proxy,
    };

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router owned every dispatcher, so the queue is now closed.
    tracing::info!("Server stopped, draining visit queue");
    match tokio::time::timeout(VISIT_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Visit worker panicked: {}", e),
        Err(_) => tracing::warn!(
            "Visit queue not drained within {}s",
            VISIT_DRAIN_TIMEOUT.as_secs()
        ),
    }

    Ok(())
}

/// Resolves on `Ctrl+C` or, on Unix, `SIGTERM`.
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
