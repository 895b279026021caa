//! Handlers for affiliate network notifications.

use axum::{
    Json,
    extract::{ConnectInfo, Query, RawQuery, State},
    http::HeaderMap,
};
use std::net::SocketAddr;

use crate::api::dto::network_event::{NetworkEventQuery, NetworkEventResponse};
use crate::application::services::NetworkNotification;
use crate::domain::entities::NetworkEventKind;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_info::client_ip;

/// Records a conversion reported by a network.
///
/// # Endpoint
///
/// `GET /postback?click_id=..&status=..&payout=..&network=..`
///
/// # Errors
///
/// Returns 400 Bad Request if `click_id` is missing or `payout` is not numeric.
pub async fn postback_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    RawQuery(raw_query): RawQuery,
    Query(query): Query<NetworkEventQuery>,
) -> Result<Json<NetworkEventResponse>, AppError> {
    record(
        NetworkEventKind::Postback,
        &state,
        &headers,
        addr,
        raw_query,
        query,
    )
    .await
}

/// Records a click confirmation reported by a network.
///
/// # Endpoint
///
/// `GET /clickback?click_id=..&network=..`
pub async fn clickback_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    RawQuery(raw_query): RawQuery,
    Query(query): Query<NetworkEventQuery>,
) -> Result<Json<NetworkEventResponse>, AppError> {
    record(
        NetworkEventKind::Clickback,
        &state,
        &headers,
        addr,
        raw_query,
        query,
    )
    .await
}

async fn record(
    kind: NetworkEventKind,
    state: &AppState,
    headers: &HeaderMap,
    addr: SocketAddr,
    raw_query: Option<String>,
    query: NetworkEventQuery,
) -> Result<Json<NetworkEventResponse>, AppError> {
    let notification = NetworkNotification {
        click_id: query.click_id,
        network: query.network,
        status: query.status,
        payout: query.payout,
        raw_query,
        ip: Some(client_ip(headers, addr, state.behind_proxy).to_string()),
    };

    let event = state.network_event_service.record(kind, notification).await?;

    Ok(Json(NetworkEventResponse {
        status: "ok",
        id: event.id,
    }))
}
