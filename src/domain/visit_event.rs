//! Visit event model for asynchronous visit logging.

use chrono::Utc;

use crate::domain::entities::{CandidateUrl, NewVisit, VisitSource};
use crate::domain::tracking_param::TrackingParams;

/// Request metadata captured from the inbound HTTP request.
///
/// All fields are optional to handle missing headers gracefully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    /// Primary language tag from `Accept-Language` (e.g. `en-US`).
    pub language: Option<String>,
    /// Client platform (e.g. `Windows`, `Android`, `iOS`).
    pub platform: Option<String>,
}

/// An immutable visit snapshot handed from the request path to the
/// background worker.
///
/// # Usage Flow
///
/// 1. Built in a handler or in [`crate::application::services::RedirectService`]
/// 2. Sent to the bounded channel with `try_send` (never awaits)
/// 3. Persisted by [`crate::domain::visit_worker::run_visit_worker`]
#[derive(Debug, Clone, PartialEq)]
pub struct VisitEvent {
    pub visit: NewVisit,
}

impl VisitEvent {
    /// Visit produced by a resolved redirect.
    pub fn redirect(
        candidate: &CandidateUrl,
        destination_url: &str,
        params: TrackingParams,
        client: ClientInfo,
    ) -> Self {
        Self::build(
            VisitSource::Redirect,
            Some(candidate.category.clone()),
            Some(candidate.network.clone()),
            Some(destination_url.to_string()),
            None,
            params,
            client,
        )
    }

    /// Visit reported by a page beacon.
    pub fn beacon(
        category: Option<String>,
        page_url: Option<String>,
        params: TrackingParams,
        client: ClientInfo,
    ) -> Self {
        Self::build(
            VisitSource::Beacon,
            category,
            None,
            None,
            page_url,
            params,
            client,
        )
    }

    fn build(
        source: VisitSource,
        category: Option<String>,
        network: Option<String>,
        destination_url: Option<String>,
        page_url: Option<String>,
        params: TrackingParams,
        client: ClientInfo,
    ) -> Self {
        Self {
            visit: NewVisit {
                source,
                category,
                network,
                destination_url,
                page_url,
                params,
                referer: client.referer,
                ip: client.ip,
                user_agent: client.user_agent,
                language: client.language,
                platform: client.platform,
                occurred_at: Utc::now(),
            },
        }
    }
}
