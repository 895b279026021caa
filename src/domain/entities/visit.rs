//! Visit record appended to the durable visit log.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::domain::tracking_param::TrackingParams;

/// Where a visit was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitSource {
    /// Served by `GET /redirect`.
    Redirect,
    /// Reported by a page beacon (`POST /api/visit`).
    Beacon,
}

impl VisitSource {
    pub fn as_str(self) -> &'static str {
        match self {
            VisitSource::Redirect => "redirect",
            VisitSource::Beacon => "beacon",
        }
    }
}

impl fmt::Display for VisitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted visit.
///
/// Never mutated or deleted by the service.
#[derive(Debug, Clone)]
pub struct Visit {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub visit: NewVisit,
}

/// Flat attribution record for one visit.
///
/// Every visit carries the full tracking parameter set regardless of
/// source, so redirects and beacons share one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVisit {
    pub source: VisitSource,
    pub category: Option<String>,
    pub network: Option<String>,
    pub destination_url: Option<String>,
    pub page_url: Option<String>,
    pub params: TrackingParams,
    pub referer: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub language: Option<String>,
    pub platform: Option<String>,
    pub occurred_at: DateTime<Utc>,
}
