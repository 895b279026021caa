//! In-process candidate cache keyed by category.

use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::entities::CompiledCandidate;

/// Immutable set of candidates for one category.
///
/// A snapshot is built in full before it becomes visible and is never
/// modified afterwards; refills replace the whole `Arc`.
#[derive(Debug)]
pub struct CandidateSnapshot {
    pub category: String,
    pub candidates: Vec<CompiledCandidate>,
    pub loaded_at: Instant,
    /// Monotonic load counter, unique per process.
    pub version: u64,
}

impl CandidateSnapshot {
    /// Snapshot that is handed out but never stored.
    pub fn empty(category: &str) -> Self {
        Self {
            category: category.to_string(),
            candidates: Vec::new(),
            loaded_at: Instant::now(),
            version: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Age strictly greater than `ttl` means stale.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.loaded_at.elapsed() <= ttl
    }
}

/// Concurrent map from category to its current snapshot.
///
/// Shard locks are held only for the map operation itself, so lookups and
/// refills for different categories never wait on each other, and a reader
/// either sees the previous snapshot or the new one.
pub struct CandidateCache {
    entries: DashMap<String, Arc<CandidateSnapshot>>,
    ttl: Duration,
    next_version: AtomicU64,
}

impl CandidateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            next_version: AtomicU64::new(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the current snapshot for `category`, fresh or not.
    pub fn get(&self, category: &str) -> Option<Arc<CandidateSnapshot>> {
        self.entries.get(category).map(|entry| entry.value().clone())
    }

    /// Returns the snapshot only if it is still within the TTL.
    pub fn get_fresh(&self, category: &str) -> Option<Arc<CandidateSnapshot>> {
        self.get(category).filter(|s| s.is_fresh(self.ttl))
    }

    /// Replaces the entry for `category` with a new snapshot.
    pub fn replace(
        &self,
        category: &str,
        candidates: Vec<CompiledCandidate>,
    ) -> Arc<CandidateSnapshot> {
        let snapshot = Arc::new(CandidateSnapshot {
            category: category.to_string(),
            candidates,
            loaded_at: Instant::now(),
            version: self.next_version.fetch_add(1, Ordering::Relaxed),
        });

        debug!(
            "Cache REFILL: {} ({} candidates, v{})",
            category,
            snapshot.candidates.len(),
            snapshot.version
        );

        self.entries.insert(category.to_string(), snapshot.clone());
        snapshot
    }

    /// Number of cached categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
