//! Redirect resolution: cached candidate lookup, random choice, templating.

use rand::Rng;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::domain::entities::{CandidateUrl, CompiledCandidate};
use crate::domain::errors::ResolveError;
use crate::domain::repositories::CandidateRepository;
use crate::domain::tracking_param::TrackingParams;
use crate::domain::visit_event::{ClientInfo, VisitEvent};
use crate::domain::visit_queue::VisitDispatcher;
use crate::error::AppError;
use crate::infrastructure::cache::{CandidateCache, CandidateSnapshot};

/// A successfully resolved redirect.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub url: String,
    pub candidate: CandidateUrl,
}

/// Service resolving a campaign category to a concrete destination URL.
///
/// Candidates are read through [`CandidateCache`]; each resolution dispatches
/// a visit to the background log without waiting for it.
pub struct RedirectService {
    repository: Arc<dyn CandidateRepository>,
    cache: Arc<CandidateCache>,
    visits: VisitDispatcher,
}

impl RedirectService {
    /// Creates a new redirect service.
    pub fn new(
        repository: Arc<dyn CandidateRepository>,
        cache: Arc<CandidateCache>,
        visits: VisitDispatcher,
    ) -> Self {
        Self {
            repository,
            cache,
            visits,
        }
    }

    pub fn cache(&self) -> &Arc<CandidateCache> {
        &self.cache
    }

    /// Number of distinct categories in the store. Used as a liveness probe.
    pub async fn count_categories(&self) -> Result<i64, AppError> {
        self.repository.count_categories().await
    }

    /// Returns the candidates of `category`, refilling the cache when the
    /// entry is missing or older than the TTL.
    ///
    /// # Store failures
    ///
    /// If the refill fails, the stale snapshot is served when one exists;
    /// otherwise an empty, uncached snapshot is returned.
    pub async fn get_candidates(&self, category: &str) -> Arc<CandidateSnapshot> {
        if let Some(snapshot) = self.cache.get_fresh(category) {
            debug!("Cache HIT for category {}", category);
            return snapshot;
        }

        debug!("Cache MISS for category {}", category);

        match self.repository.find_by_category(category).await {
            Ok(rows) => {
                let candidates = compile_candidates(rows);
                self.cache.replace(category, candidates)
            }
            Err(e) => match self.cache.get(category) {
                Some(stale) => {
                    warn!(
                        "Candidate refill for {} failed, serving stale v{}: {}",
                        category, stale.version, e
                    );
                    stale
                }
                None => {
                    error!("Candidate refill for {} failed: {}", category, e);
                    Arc::new(CandidateSnapshot::empty(category))
                }
            },
        }
    }

    /// Resolves `category` to a destination URL and logs the visit.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NoCandidates`] if the category has no usable candidates
    /// - [`ResolveError::MissingParameter`] if the chosen template references a
    ///   parameter absent from `params`
    pub async fn resolve(
        &self,
        category: &str,
        params: TrackingParams,
        client: ClientInfo,
    ) -> Result<Resolution, ResolveError> {
        let snapshot = self.get_candidates(category).await;

        let chosen = pick(&snapshot.candidates).ok_or_else(|| ResolveError::NoCandidates {
            category: category.to_string(),
        })?;

        let url = chosen.template.render(&params)?;

        self.visits.dispatch(VisitEvent::redirect(
            &chosen.candidate,
            &url,
            params,
            client,
        ));

        Ok(Resolution {
            url,
            candidate: chosen.candidate.clone(),
        })
    }
}

/// Uniform random choice over the current candidate list.
fn pick(candidates: &[CompiledCandidate]) -> Option<&CompiledCandidate> {
    if candidates.is_empty() {
        return None;
    }
    let idx = rand::rng().random_range(0..candidates.len());
    candidates.get(idx)
}

/// Compiles rows, skipping any whose template is invalid.
fn compile_candidates(rows: Vec<CandidateUrl>) -> Vec<CompiledCandidate> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match row.compile() {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    error!("Skipping candidate {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockCandidateRepository;
    use crate::domain::tracking_param::TrackingParam;
    use crate::domain::visit_event::VisitEvent;
    use crate::domain::entities::NewCandidate;
    use crate::domain::visit_queue::VisitMetrics;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;
    use tokio::sync::{Notify, mpsc};
    use tokio::task::JoinSet;

    fn candidate(id: i64, domain: &str, path: &str) -> CandidateUrl {
        CandidateUrl {
            id,
            domain: domain.to_string(),
            path_template: path.to_string(),
            category: "finance".to_string(),
            network: format!("net-{}", id),
            geography: "US".to_string(),
            created_at: Utc::now(),
        }
    }

    fn finance_rows() -> Vec<CandidateUrl> {
        vec![
            candidate(1, "https://a.example", "/go/{click_id}"),
            candidate(2, "https://b.example", "/go/{click_id}"),
        ]
    }

    fn service(
        repo: MockCandidateRepository,
        ttl: Duration,
        queue: usize,
    ) -> (RedirectService, mpsc::Receiver<VisitEvent>) {
        let (visits, rx) = VisitDispatcher::channel(queue, Arc::new(VisitMetrics::new()));
        let service = RedirectService::new(
            Arc::new(repo),
            Arc::new(CandidateCache::new(ttl)),
            visits,
        );
        (service, rx)
    }

    fn click(value: &str) -> TrackingParams {
        TrackingParams::default().with(TrackingParam::ClickId, value)
    }

    #[tokio::test]
    async fn test_resolve_finance_scenario() {
        let mut repo = MockCandidateRepository::new();
        repo.expect_find_by_category()
            .withf(|c| c == "finance")
            .returning(|_| Ok(finance_rows()));

        let (service, mut rx) = service(repo, Duration::from_secs(60), 16);

        let resolution = service
            .resolve("finance", click("42"), ClientInfo::default())
            .await
            .unwrap();

        assert!(
            resolution.url == "https://a.example/go/42"
                || resolution.url == "https://b.example/go/42"
        );

        let event = rx.try_recv().unwrap();
        assert_eq!(event.visit.destination_url.as_deref(), Some(resolution.url.as_str()));
        assert_eq!(event.visit.network, Some(resolution.candidate.network.clone()));
        assert_eq!(event.visit.params.click_id.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn test_resolve_unknown_category() {
        let mut repo = MockCandidateRepository::new();
        repo.expect_find_by_category().returning(|_| Ok(vec![]));

        let (service, mut rx) = service(repo, Duration::from_secs(60), 16);

        let err = service
            .resolve("unknown", click("1"), ClientInfo::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No URLs found for category 'unknown'");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_missing_parameter() {
        let mut repo = MockCandidateRepository::new();
        repo.expect_find_by_category()
            .returning(|_| Ok(vec![candidate(1, "https://a.example", "/go/{teaser_id}")]));

        let (service, mut rx) = service(repo, Duration::from_secs(60), 16);

        let err = service
            .resolve("finance", click("1"), ClientInfo::default())
            .await
            .unwrap_err();

        assert_eq!(err, ResolveError::MissingParameter(TrackingParam::TeaserId));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_fetch_within_ttl_and_one_refetch_after() {
        let mut repo = MockCandidateRepository::new();
        repo.expect_find_by_category()
            .times(2)
            .returning(|_| Ok(finance_rows()));

        let (service, _rx) = service(repo, Duration::from_secs(30), 16);

        let first = service.get_candidates("finance").await;
        tokio::time::advance(Duration::from_secs(10)).await;
        let second = service.get_candidates("finance").await;
        assert_eq!(first.version, second.version);

        tokio::time::advance(Duration::from_secs(21)).await;
        let third = service.get_candidates("finance").await;
        assert!(third.version > first.version);

        let fourth = service.get_candidates("finance").await;
        assert_eq!(third.version, fourth.version);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_failure_serves_stale_snapshot() {
        let mut repo = MockCandidateRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_find_by_category()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(finance_rows()));
        repo.expect_find_by_category()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let (service, _rx) = service(repo, Duration::from_secs(5), 16);

        let fresh = service.get_candidates("finance").await;
        tokio::time::advance(Duration::from_secs(6)).await;

        let stale = service.get_candidates("finance").await;
        assert_eq!(stale.version, fresh.version);
        assert_eq!(stale.candidates.len(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_without_cache_reports_no_candidates() {
        let mut repo = MockCandidateRepository::new();
        repo.expect_find_by_category()
            .times(2)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let (service, _rx) = service(repo, Duration::from_secs(60), 16);

        let err = service
            .resolve("finance", click("1"), ClientInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::NoCandidates { .. }));

        // Failure is not cached: the next call tries the store again.
        assert!(service.get_candidates("finance").await.is_empty());
        assert!(service.cache().get("finance").is_none());
    }

    #[tokio::test]
    async fn test_invalid_templates_are_skipped_at_load() {
        let mut repo = MockCandidateRepository::new();
        repo.expect_find_by_category().returning(|_| {
            Ok(vec![
                candidate(1, "https://a.example", "/go/{gclid}"),
                candidate(2, "https://b.example", "/go/{click_id}"),
            ])
        });

        let (service, _rx) = service(repo, Duration::from_secs(60), 16);

        for _ in 0..20 {
            let resolution = service
                .resolve("finance", click("7"), ClientInfo::default())
                .await
                .unwrap();
            assert_eq!(resolution.url, "https://b.example/go/7");
        }
    }

    #[tokio::test]
    async fn test_selection_is_uniform() {
        const K: usize = 4;
        const N: usize = 10_000;

        let mut repo = MockCandidateRepository::new();
        repo.expect_find_by_category().times(1).returning(|_| {
            Ok((0..K as i64)
                .map(|i| candidate(i, &format!("https://c{}.example", i), "/go/{click_id}"))
                .collect())
        });

        let (service, _rx) = service(repo, Duration::from_secs(3600), 1);

        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..N {
            let resolution = service
                .resolve("finance", click("1"), ClientInfo::default())
                .await
                .unwrap();
            *counts.entry(resolution.url).or_default() += 1;
        }

        assert_eq!(counts.len(), K);
        let expected = N / K;
        let tolerance = expected * 15 / 100;
        for (url, count) in counts {
            assert!(
                count.abs_diff(expected) <= tolerance,
                "{} selected {} times, expected {}±{}",
                url,
                count,
                expected,
                tolerance
            );
        }
    }

    #[tokio::test]
    async fn test_full_queue_does_not_fail_resolution() {
        let mut repo = MockCandidateRepository::new();
        repo.expect_find_by_category()
            .returning(|_| Ok(finance_rows()));

        let (service, _rx) = service(repo, Duration::from_secs(60), 1);

        for _ in 0..5 {
            assert!(
                service
                    .resolve("finance", click("1"), ClientInfo::default())
                    .await
                    .is_ok()
            );
        }
    }

    /// Each fetch returns a new generation: `gen % 3 + 1` rows, all tagged
    /// with the generation in `network` and `domain`.
    #[derive(Default)]
    struct ChangingRepository {
        generation: AtomicU64,
    }

    #[async_trait]
    impl CandidateRepository for ChangingRepository {
        async fn find_by_category(
            &self,
            _category: &str,
        ) -> Result<Vec<CandidateUrl>, AppError> {
            let generation = self.generation.fetch_add(1, Ordering::SeqCst);
            let mut rows = Vec::new();
            for i in 0..(generation % 3 + 1) as i64 {
                tokio::task::yield_now().await;
                let domain = format!("https://g{}.example", generation);
                let mut row = candidate(i, &domain, "/go/{click_id}");
                row.network = format!("gen-{}", generation);
                rows.push(row);
            }
            Ok(rows)
        }

        async fn create(&self, _new_candidate: NewCandidate) -> Result<CandidateUrl, AppError> {
            Err(AppError::internal("read-only", json!({})))
        }

        async fn list(&self, _category: Option<String>) -> Result<Vec<CandidateUrl>, AppError> {
            Ok(vec![])
        }

        async fn delete(&self, _id: i64) -> Result<bool, AppError> {
            Ok(false)
        }

        async fn count_categories(&self) -> Result<i64, AppError> {
            Ok(1)
        }
    }

    /// Holds every `find_by_category("a")` until `release` is notified.
    #[derive(Default)]
    struct BlockingRepository {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl CandidateRepository for BlockingRepository {
        async fn find_by_category(
            &self,
            category: &str,
        ) -> Result<Vec<CandidateUrl>, AppError> {
            if category == "a" {
                self.entered.notify_one();
                self.release.notified().await;
            }
            let mut row = candidate(1, "https://a.example", "/go/{click_id}");
            row.category = category.to_string();
            Ok(vec![row])
        }

        async fn create(&self, _new_candidate: NewCandidate) -> Result<CandidateUrl, AppError> {
            Err(AppError::internal("read-only", json!({})))
        }

        async fn list(&self, _category: Option<String>) -> Result<Vec<CandidateUrl>, AppError> {
            Ok(vec![])
        }

        async fn delete(&self, _id: i64) -> Result<bool, AppError> {
            Ok(false)
        }

        async fn count_categories(&self) -> Result<i64, AppError> {
            Ok(2)
        }
    }

    fn assert_whole_generation(snapshot: &CandidateSnapshot) {
        let network = &snapshot.candidates[0].candidate.network;
        let generation: u64 = network.trim_start_matches("gen-").parse().unwrap();

        assert_eq!(snapshot.candidates.len() as u64, generation % 3 + 1);
        for compiled in &snapshot.candidates {
            assert_eq!(&compiled.candidate.network, network);
            assert_eq!(
                compiled.candidate.domain,
                format!("https://g{}.example", generation)
            );
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_refills_never_expose_partial_snapshots() {
        let repo = Arc::new(ChangingRepository::default());
        let (visits, _rx) = VisitDispatcher::channel(16, Arc::new(VisitMetrics::new()));
        let service = Arc::new(RedirectService::new(
            repo.clone(),
            Arc::new(CandidateCache::new(Duration::ZERO)),
            visits,
        ));

        let mut tasks = JoinSet::new();
        for _ in 0..16 {
            let service = service.clone();
            tasks.spawn(async move {
                for _ in 0..50 {
                    let snapshot = service.get_candidates("finance").await;
                    assert_whole_generation(&snapshot);

                    let resolution = service
                        .resolve("finance", click("1"), ClientInfo::default())
                        .await
                        .unwrap();
                    let generation = resolution.candidate.network.trim_start_matches("gen-");
                    assert_eq!(
                        resolution.url,
                        format!("https://g{}.example/go/1", generation)
                    );
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            joined.unwrap();
        }

        assert!(repo.generation.load(Ordering::SeqCst) > 16);
        assert_whole_generation(&service.cache().get("finance").unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_refill_does_not_block_other_categories() {
        let repo = Arc::new(BlockingRepository::default());
        let (visits, _rx) = VisitDispatcher::channel(16, Arc::new(VisitMetrics::new()));
        let service = Arc::new(RedirectService::new(
            repo.clone(),
            Arc::new(CandidateCache::new(Duration::from_secs(60))),
            visits,
        ));

        let slow = tokio::spawn({
            let service = service.clone();
            async move { service.get_candidates("a").await }
        });
        repo.entered.notified().await;

        let other = tokio::time::timeout(Duration::from_secs(1), service.get_candidates("b"))
            .await
            .expect("refill of 'b' waited on 'a'");
        assert_eq!(other.candidates.len(), 1);
        assert_eq!(other.candidates[0].candidate.category, "b");
        assert!(!slow.is_finished());

        repo.release.notify_one();
        let a = slow.await.unwrap();
        assert_eq!(a.candidates[0].candidate.category, "a");
        assert_eq!(service.cache().len(), 2);
    }
}
