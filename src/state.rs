//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LeadService, NetworkEventService, RedirectService};
use crate::domain::visit_queue::VisitDispatcher;

#[derive(Clone)]
pub struct AppState {
    pub redirect_service: Arc<RedirectService>,
    pub lead_service: Arc<LeadService>,
    pub network_event_service: Arc<NetworkEventService>,
    pub visits: VisitDispatcher,
    /// Read the client IP from `X-Forwarded-For` / `X-Real-IP`.
    pub behind_proxy: bool,
}
