#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;
use traffic_attribution::application::services::{
    LeadService, NetworkEventService, RedirectService,
};
use traffic_attribution::domain::entities::{
    CandidateUrl, Lead, NetworkEvent, NewCandidate, NewLead, NewNetworkEvent,
};
use traffic_attribution::domain::repositories::{
    CandidateRepository, LeadRepository, NetworkEventRepository,
};
use traffic_attribution::domain::visit_event::VisitEvent;
use traffic_attribution::domain::visit_queue::{VisitDispatcher, VisitMetrics};
use traffic_attribution::error::AppError;
use traffic_attribution::infrastructure::cache::CandidateCache;
use traffic_attribution::state::AppState;

pub const PEER_ADDR: &str = "127.0.0.1:12345";

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

fn store_down() -> AppError {
    AppError::internal("Database error", json!({}))
}

#[derive(Default)]
pub struct InMemoryCandidateRepository {
    rows: Mutex<Vec<CandidateUrl>>,
    next_id: AtomicUsize,
    pub finds: AtomicUsize,
    pub fail: AtomicBool,
}

impl InMemoryCandidateRepository {
    pub fn insert(&self, category: &str, domain: &str, path_template: &str, network: &str) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        self.rows.lock().unwrap().push(CandidateUrl {
            id,
            domain: domain.to_string(),
            path_template: path_template.to_string(),
            category: category.to_string(),
            network: network.to_string(),
            geography: String::new(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn find_count(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CandidateRepository for InMemoryCandidateRepository {
    async fn find_by_category(&self, category: &str) -> Result<Vec<CandidateUrl>, AppError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.category == category)
            .cloned()
            .collect())
    }

    async fn create(&self, new_candidate: NewCandidate) -> Result<CandidateUrl, AppError> {
        let id = self.insert(
            &new_candidate.category,
            &new_candidate.domain,
            &new_candidate.path_template,
            &new_candidate.network,
        );
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(store_down)
    }

    async fn list(&self, category: Option<String>) -> Result<Vec<CandidateUrl>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| category.as_deref().is_none_or(|cat| c.category == cat))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        Ok(rows.len() != before)
    }

    async fn count_categories(&self) -> Result<i64, AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        let rows = self.rows.lock().unwrap();
        let mut categories: Vec<&str> = rows.iter().map(|c| c.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        Ok(categories.len() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryLeadRepository {
    pub leads: Mutex<Vec<NewLead>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn create(&self, new_lead: NewLead) -> Result<Lead, AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        let mut leads = self.leads.lock().unwrap();
        leads.push(new_lead.clone());
        Ok(Lead {
            id: leads.len() as i64,
            name: new_lead.name,
            phone: new_lead.phone,
            ip: new_lead.ip,
            user_agent: new_lead.user_agent,
            created_at: Utc::now(),
        })
    }
}

#[derive(Default)]
pub struct InMemoryNetworkEventRepository {
    pub events: Mutex<Vec<NewNetworkEvent>>,
}

#[async_trait]
impl NetworkEventRepository for InMemoryNetworkEventRepository {
    async fn record(&self, new_event: NewNetworkEvent) -> Result<NetworkEvent, AppError> {
        let mut events = self.events.lock().unwrap();
        events.push(new_event.clone());
        Ok(NetworkEvent {
            id: events.len() as i64,
            created_at: Utc::now(),
            event: new_event,
        })
    }
}

/// Application state wired to in-memory repositories.
pub struct TestContext {
    pub state: AppState,
    pub visit_rx: mpsc::Receiver<VisitEvent>,
    pub candidates: Arc<InMemoryCandidateRepository>,
    pub leads: Arc<InMemoryLeadRepository>,
    pub network_events: Arc<InMemoryNetworkEventRepository>,
}

pub fn create_test_context(queue_capacity: usize) -> TestContext {
    let candidates = Arc::new(InMemoryCandidateRepository::default());
    let leads = Arc::new(InMemoryLeadRepository::default());
    let network_events = Arc::new(InMemoryNetworkEventRepository::default());

    let (visits, visit_rx) = VisitDispatcher::channel(queue_capacity, Arc::new(VisitMetrics::new()));
    let cache = Arc::new(CandidateCache::new(Duration::from_secs(300)));

    let state = AppState {
        redirect_service: Arc::new(RedirectService::new(
            candidates.clone(),
            cache,
            visits.clone(),
        )),
        lead_service: Arc::new(LeadService::new(leads.clone())),
        network_event_service: Arc::new(NetworkEventService::new(network_events.clone())),
        visits,
        behind_proxy: false,
    };

    TestContext {
        state,
        visit_rx,
        candidates,
        leads,
        network_events,
    }
}

/// Serves `router` with a fixed peer address.
pub fn test_server(router: Router<AppState>, state: AppState) -> TestServer {
    let app = router.layer(MockConnectInfoLayer).with_state(state);
    TestServer::new(app).unwrap()
}
