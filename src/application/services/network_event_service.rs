//! Affiliate-network postback and clickback recording.

use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::domain::entities::{NetworkEvent, NetworkEventKind, NewNetworkEvent};
use crate::domain::repositories::NetworkEventRepository;
use crate::error::AppError;

/// Raw notification fields as received from the network.
#[derive(Debug, Clone, Default)]
pub struct NetworkNotification {
    pub click_id: Option<String>,
    pub network: Option<String>,
    pub status: Option<String>,
    pub payout: Option<String>,
    pub raw_query: Option<String>,
    pub ip: Option<String>,
}

/// Service validating and persisting network notifications.
pub struct NetworkEventService {
    repository: Arc<dyn NetworkEventRepository>,
}

impl NetworkEventService {
    pub fn new(repository: Arc<dyn NetworkEventRepository>) -> Self {
        Self { repository }
    }

    /// Records a postback or clickback.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `click_id` is missing or `payout`
    /// is not a finite number.
    /// Returns [`AppError::Internal`] if the store write fails.
    pub async fn record(
        &self,
        kind: NetworkEventKind,
        notification: NetworkNotification,
    ) -> Result<NetworkEvent, AppError> {
        let click_id = notification
            .click_id
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                AppError::bad_request(
                    "Missing required parameter 'click_id'",
                    json!({ "kind": kind.as_str() }),
                )
            })?;

        let payout = notification
            .payout
            .as_deref()
            .map(parse_payout)
            .transpose()?;

        let new_event = NewNetworkEvent {
            kind,
            click_id,
            network: notification.network,
            status: notification.status,
            payout,
            raw_query: notification.raw_query,
            ip: notification.ip,
        };

        match self.repository.record(new_event).await {
            Ok(event) => {
                info!(
                    "{} {} recorded for click {}",
                    kind, event.id, event.event.click_id
                );
                Ok(event)
            }
            Err(e) => {
                error!("Failed to store {}: {}", kind, e);
                Err(e)
            }
        }
    }
}

fn parse_payout(raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| AppError::bad_request("Invalid payout", json!({ "payout": raw })))
}
