//! Affiliate-network notifications (postbacks and clickbacks).

use chrono::{DateTime, Utc};
use std::fmt;

/// Kind of notification received from an affiliate network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkEventKind {
    /// Conversion reported for a previously issued click.
    Postback,
    /// Click reported by the network.
    Clickback,
}

impl NetworkEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkEventKind::Postback => "postback",
            NetworkEventKind::Clickback => "clickback",
        }
    }
}

impl fmt::Display for NetworkEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored network notification.
#[derive(Debug, Clone)]
pub struct NetworkEvent {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub event: NewNetworkEvent,
}

/// Input data for recording a network notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNetworkEvent {
    pub kind: NetworkEventKind,
    pub click_id: String,
    pub network: Option<String>,
    pub status: Option<String>,
    pub payout: Option<f64>,
    /// Query string exactly as received, kept for reconciliation.
    pub raw_query: Option<String>,
    pub ip: Option<String>,
}
