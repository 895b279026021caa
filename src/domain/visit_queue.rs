//! Non-blocking hand-off of visit events to the background worker.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{error, warn};

use crate::domain::visit_event::VisitEvent;

/// Outcome counters for the visit log.
///
/// Kept in-process for the health endpoint and mirrored to the `metrics`
/// facade for whatever exporter the binary installs.
#[derive(Debug, Default)]
pub struct VisitMetrics {
    enqueued: AtomicU64,
    dropped: AtomicU64,
    persisted: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time copy of [`VisitMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct VisitCounts {
    pub enqueued: u64,
    pub dropped: u64,
    pub persisted: u64,
    pub failed: u64,
}

impl VisitMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("visits_enqueued_total").increment(1);
    }

    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("visits_dropped_total").increment(1);
    }

    pub fn record_persisted(&self) {
        self.persisted.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("visits_persisted_total").increment(1);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("visits_failed_total").increment(1);
    }

    pub fn snapshot(&self) -> VisitCounts {
        VisitCounts {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            persisted: self.persisted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Sending half of the visit queue.
///
/// [`VisitDispatcher::dispatch`] never waits: when the queue is full or the
/// worker is gone, the event is dropped and counted.
#[derive(Clone)]
pub struct VisitDispatcher {
    sender: mpsc::Sender<VisitEvent>,
    metrics: Arc<VisitMetrics>,
}

impl VisitDispatcher {
    pub fn new(sender: mpsc::Sender<VisitEvent>, metrics: Arc<VisitMetrics>) -> Self {
        Self { sender, metrics }
    }

    /// Creates a queue of `capacity` events and returns both halves.
    pub fn channel(
        capacity: usize,
        metrics: Arc<VisitMetrics>,
    ) -> (Self, mpsc::Receiver<VisitEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx, metrics), rx)
    }

    /// Enqueues an event without blocking.
    ///
    /// Returns `true` if the event was accepted by the queue.
    pub fn dispatch(&self, event: VisitEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => {
                self.metrics.record_enqueued();
                true
            }
            Err(TrySendError::Full(_)) => {
                warn!("Visit queue full, dropping visit");
                self.metrics.record_dropped();
                false
            }
            Err(TrySendError::Closed(_)) => {
                error!("Visit queue closed, dropping visit");
                self.metrics.record_dropped();
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots currently available in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    pub fn metrics(&self) -> &Arc<VisitMetrics> {
        &self.metrics
    }
}
