//! Background worker persisting visit events.
//!
//! Drains the visit queue and writes each event through
//! [`VisitRepository`]. Writes run concurrently up to a configured limit,
//! each attempt is bounded by a timeout, and a failed write is retried a few
//! times with jittered exponential backoff before it is dropped.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::domain::entities::NewVisit;
use crate::domain::repositories::VisitRepository;
use crate::domain::visit_event::VisitEvent;
use crate::domain::visit_queue::VisitMetrics;
use crate::error::AppError;

/// Tuning for [`run_visit_worker`].
#[derive(Debug, Clone, Copy)]
pub struct VisitWorkerConfig {
    /// Maximum number of writes in flight.
    pub concurrency: usize,
    /// Upper bound for a single write attempt.
    pub write_timeout: Duration,
    /// Retries after the first failed attempt.
    pub max_retries: usize,
}

impl Default for VisitWorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            write_timeout: Duration::from_secs(2),
            max_retries: 2,
        }
    }
}

/// Failure of a single visit write attempt.
#[derive(Debug, thiserror::Error)]
pub enum VisitWriteError {
    #[error("visit write timed out after {0:?}")]
    Timeout(Duration),

    #[error("visit write failed: {0}")]
    Store(#[from] AppError),
}

/// Runs until every sender is dropped and the queue is drained.
pub async fn run_visit_worker(
    mut rx: mpsc::Receiver<VisitEvent>,
    repository: Arc<dyn VisitRepository>,
    metrics: Arc<VisitMetrics>,
    config: VisitWorkerConfig,
) {
    let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        let metrics = metrics.clone();

        tasks.spawn(async move {
            let _permit = permit;
            match persist_visit(repository.as_ref(), event.visit, &config).await {
                Ok(()) => metrics.record_persisted(),
                Err(e) => {
                    error!("Dropping visit after retries: {}", e);
                    metrics.record_failed();
                }
            }
        });

        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}
    info!("Visit worker stopped");
}

/// Writes one visit with timeout and bounded retry.
async fn persist_visit(
    repository: &dyn VisitRepository,
    visit: NewVisit,
    config: &VisitWorkerConfig,
) -> Result<(), VisitWriteError> {
    let strategy = ExponentialBackoff::from_millis(10)
        .factor(5)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(config.max_retries);

    Retry::spawn(strategy, || {
        let visit = visit.clone();
        async move {
            match tokio::time::timeout(config.write_timeout, repository.record_visit(visit)).await
            {
                Ok(Ok(stored)) => {
                    debug!("Visit {} persisted", stored.id);
                    Ok(())
                }
                Ok(Err(e)) => {
                    warn!("Visit write attempt failed: {}", e);
                    Err(VisitWriteError::Store(e))
                }
                Err(_) => {
                    warn!("Visit write attempt timed out");
                    Err(VisitWriteError::Timeout(config.write_timeout))
                }
            }
        }
    })
    .await
}
